//! Nickname to formal first-name table.
//!
//! Each family lists a formal name followed by its common short forms. A
//! name may belong to several families ("bert" is short for both Albert and
//! Robert); two names are equivalent when they share any family.

use std::collections::HashMap;
use std::sync::OnceLock;

const FAMILIES: &[&[&str]] = &[
    &["robert", "bob", "bobby", "rob", "robbie", "bert"],
    &["william", "will", "bill", "billy", "liam", "willy"],
    &["richard", "rick", "ricky", "dick", "rich", "richie"],
    &["james", "jim", "jimmy", "jamie"],
    &["john", "jack", "johnny", "jon"],
    &["jonathan", "jon", "jonny", "nate"],
    &["michael", "mike", "mikey", "mick", "mickey"],
    &["christopher", "chris", "kit", "topher"],
    &["christina", "chris", "tina", "chrissy"],
    &["christine", "chris", "chrissy"],
    &["elizabeth", "liz", "lizzie", "beth", "betty", "eliza", "libby"],
    &["katherine", "kate", "katie", "kathy", "kat", "kay"],
    &["catherine", "cate", "cathy", "cat"],
    &["margaret", "maggie", "meg", "peggy", "marge"],
    &["jennifer", "jen", "jenny"],
    &["jessica", "jess", "jessie"],
    &["rebecca", "becky", "becca"],
    &["samantha", "sam", "sammy"],
    &["samuel", "sam", "sammy"],
    &["alexander", "alex", "xander", "sasha"],
    &["alexandra", "alex", "lexi", "sasha"],
    &["andrew", "andy", "drew"],
    &["anthony", "tony", "ant"],
    &["benjamin", "ben", "benny", "benji"],
    &["daniel", "dan", "danny"],
    &["david", "dave", "davey"],
    &["edward", "ed", "eddie", "ted", "ned"],
    &["joseph", "joe", "joey"],
    &["joshua", "josh"],
    &["matthew", "matt", "matty"],
    &["nicholas", "nick", "nicky"],
    &["patrick", "pat", "paddy"],
    &["patricia", "pat", "patty", "trish"],
    &["peter", "pete"],
    &["steven", "steve", "stevie"],
    &["stephen", "steve", "stevie"],
    &["thomas", "tom", "tommy"],
    &["timothy", "tim", "timmy"],
    &["victoria", "vicky", "tori"],
    &["gregory", "greg"],
    &["jeffrey", "jeff"],
    &["kenneth", "ken", "kenny"],
    &["ronald", "ron", "ronnie"],
    &["donald", "don", "donnie"],
    &["albert", "al", "bert", "bertie"],
    &["zachary", "zach", "zack"],
    &["abigail", "abby", "gail"],
    &["susan", "sue", "susie"],
    &["deborah", "deb", "debbie"],
];

fn index() -> &'static HashMap<&'static str, Vec<usize>> {
    static INDEX: OnceLock<HashMap<&'static str, Vec<usize>>> = OnceLock::new();
    INDEX.get_or_init(|| {
        let mut map: HashMap<&'static str, Vec<usize>> = HashMap::new();
        for (family, names) in FAMILIES.iter().enumerate() {
            for name in *names {
                map.entry(*name).or_default().push(family);
            }
        }
        map
    })
}

fn families(name: &str) -> &'static [usize] {
    index().get(name).map(Vec::as_slice).unwrap_or(&[])
}

/// True when two different lowercase first names are nickname-equivalent.
pub fn is_nickname_of(a: &str, b: &str) -> bool {
    if a == b {
        return false;
    }
    let other = families(b);
    families(a).iter().any(|f| other.contains(f))
}
