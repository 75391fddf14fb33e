//! Group resolution: clusters of mutually-requesting players.
//!
//! Groups are rebuilt from scratch on every pass. Each player's teammate
//! requests are resolved to roster ids, mutual pairs become edges, and each
//! connected component of two to four players becomes a group. Larger
//! components are reported instead of being truncated.
//!
//! Identity is stable across passes: a component containing an existing
//! group inherits that group's id, label and color. A group that lost
//! members lives on in the component that still holds two or more of them.
//! New groups take the lowest free label slot, so labels freed by dissolved
//! groups are reused.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use roster_match::WarningLedger;
use roster_model::{
    GroupId, MAX_GROUP_SIZE, MIN_GROUP_SIZE, ModelError, PlayerGroup, PlayerId, Roster,
    WarningStatus,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::GroupError;

type Adjacency = BTreeMap<PlayerId, BTreeSet<PlayerId>>;

/// A connected component too large to become one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OversizedCluster {
    pub members: BTreeSet<PlayerId>,
    /// Existing groups inside the cluster, left as they were.
    pub kept_groups: Vec<GroupId>,
}

impl OversizedCluster {
    /// True when the cluster would have merged two or more existing groups.
    pub fn is_refused_merge(&self) -> bool {
        self.kept_groups.len() >= 2
    }
}

/// What a resolver pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolveReport {
    /// Every group after the pass, in id order.
    pub groups: Vec<GroupId>,
    pub created: Vec<GroupId>,
    /// Existing groups whose membership changed.
    pub updated: Vec<GroupId>,
    pub removed: Vec<GroupId>,
    pub oversized: Vec<OversizedCluster>,
}

impl ResolveReport {
    pub fn is_unchanged(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

/// Derives and edits player groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupResolver;

impl GroupResolver {
    pub fn new() -> Self {
        Self
    }

    /// Teammates a player's requests resolve to.
    ///
    /// For each request the latest ledger entry wins: an accepted warning
    /// resolves to its canonical name, while a rejected or still pending one
    /// drops the request. A request with no ledger entry counts only when it
    /// is an exact, unique roster name.
    pub fn resolved_requests(
        &self,
        roster: &Roster,
        ledger: &WarningLedger,
        player: PlayerId,
    ) -> BTreeSet<PlayerId> {
        let mut resolved = BTreeSet::new();
        let Some(requester) = roster.player(player) else {
            return resolved;
        };
        for request in &requester.teammate_requests {
            let name = match ledger.decision_for(player, request) {
                Some(w) if w.status == WarningStatus::Accepted => w.effective_match(),
                Some(_) => continue,
                None => Some(request.as_str()),
            };
            let Some(name) = name else {
                continue;
            };
            let hits: Vec<PlayerId> = roster
                .players_named(name)
                .into_iter()
                .filter(|id| *id != player)
                .collect();
            match hits.as_slice() {
                [only] => {
                    resolved.insert(*only);
                }
                [] => {}
                _ => warn!(
                    requester = %player,
                    name,
                    "request names several players; ignored"
                ),
            }
        }
        resolved
    }

    /// Mutual-request graph over the whole roster.
    fn adjacency(&self, roster: &Roster, ledger: &WarningLedger) -> Adjacency {
        let requests: BTreeMap<PlayerId, BTreeSet<PlayerId>> = roster
            .players
            .iter()
            .map(|p| (p.id, self.resolved_requests(roster, ledger, p.id)))
            .collect();
        let mut adjacency = Adjacency::new();
        for (player, wanted) in &requests {
            for other in wanted {
                let mutual = requests
                    .get(other)
                    .is_some_and(|theirs| theirs.contains(player));
                if mutual {
                    adjacency.entry(*player).or_default().insert(*other);
                    adjacency.entry(*other).or_default().insert(*player);
                }
            }
        }
        adjacency
    }

    /// Rebuild every group from roster requests and ledger decisions.
    pub fn recompute(&self, roster: &mut Roster, ledger: &WarningLedger) -> ResolveReport {
        let adjacency = self.adjacency(roster, ledger);
        let previous = std::mem::take(&mut roster.groups);
        let mut report = ResolveReport::default();
        let mut next: BTreeMap<GroupId, PlayerGroup> = BTreeMap::new();
        let mut fresh: Vec<BTreeSet<PlayerId>> = Vec::new();
        let mut inherited: BTreeSet<GroupId> = BTreeSet::new();

        for component in components(&adjacency) {
            let contained: Vec<&PlayerGroup> = previous
                .values()
                .filter(|g| g.members.is_subset(&component))
                .collect();

            if component.len() > MAX_GROUP_SIZE {
                let kept: Vec<GroupId> = contained
                    .iter()
                    .filter(|g| is_connected(&g.members, &adjacency))
                    .map(|g| g.id)
                    .collect();
                warn!(
                    size = component.len(),
                    kept = kept.len(),
                    "mutual-request cluster exceeds the group limit; not grouped"
                );
                for id in &kept {
                    if let Some(group) = previous.get(id) {
                        next.insert(*id, group.clone());
                    }
                }
                report.oversized.push(OversizedCluster {
                    members: component,
                    kept_groups: kept,
                });
                continue;
            }

            if roster.dissolved.contains(&component) {
                debug!(size = component.len(), "cluster was dissolved; not rebuilt");
                continue;
            }

            let heir = contained
                .first()
                .copied()
                .or_else(|| shrunk_group(&previous, &component, &inherited));
            match heir {
                Some(group) => {
                    inherited.insert(group.id);
                    if group.members != component {
                        report.updated.push(group.id);
                    }
                    let mut group = group.clone();
                    group.members = component;
                    next.insert(group.id, group);
                }
                None => fresh.push(component),
            }
        }

        let mut used_slots: BTreeSet<u32> = next.values().map(|g| g.slot).collect();
        for members in fresh {
            let slot = (0..).find(|slot| !used_slots.contains(slot)).unwrap_or(0);
            used_slots.insert(slot);
            let id = roster.allocate_group_id();
            debug!(group = %id, size = members.len(), "group created");
            next.insert(id, PlayerGroup::new(id, slot, members));
            report.created.push(id);
        }

        report.removed = previous
            .keys()
            .filter(|id| !next.contains_key(id))
            .copied()
            .collect();
        report.groups = next.keys().copied().collect();
        roster.groups = next;
        sync_player_groups(roster);

        if !report.is_unchanged() || !report.oversized.is_empty() {
            info!(
                groups = report.groups.len(),
                created = report.created.len(),
                updated = report.updated.len(),
                removed = report.removed.len(),
                oversized = report.oversized.len(),
                "groups recomputed"
            );
        }
        report
    }

    /// Merge group `second` into `first`.
    ///
    /// Refused without changes when the result would exceed the size cap or
    /// when no mutual request links the two groups.
    pub fn merge(
        &self,
        roster: &mut Roster,
        ledger: &WarningLedger,
        first: GroupId,
        second: GroupId,
    ) -> Result<GroupId, GroupError> {
        if first == second {
            return Err(GroupError::SameGroup(first));
        }
        let a = roster.group(first).ok_or(ModelError::UnknownGroup(first))?;
        let b = roster.group(second).ok_or(ModelError::UnknownGroup(second))?;
        let (kept, absorbed) = if first < second { (a, b) } else { (b, a) };
        let mut merged = kept.clone();
        merged.members.extend(&absorbed.members);
        if !merged.is_valid_size() {
            warn!(%first, %second, "group merge refused: too large");
            return Err(GroupError::MergeTooLarge {
                first,
                second,
                first_size: a.len(),
                second_size: b.len(),
                max: MAX_GROUP_SIZE,
            });
        }
        let adjacency = self.adjacency(roster, ledger);
        let linked = a.members.iter().any(|member| {
            adjacency
                .get(member)
                .is_some_and(|peers| !peers.is_disjoint(&b.members))
        });
        if !linked {
            return Err(GroupError::NotLinked { first, second });
        }

        let keep = merged.id;
        let absorb = absorbed.id;
        roster.groups.remove(&absorb);
        roster.groups.insert(keep, merged);
        sync_player_groups(roster);
        info!(group = %keep, absorbed = %absorb, "groups merged");
        Ok(keep)
    }

    /// Remove a group and remember its member set so later passes leave
    /// those players ungrouped.
    pub fn dissolve(&self, roster: &mut Roster, id: GroupId) -> Result<PlayerGroup, GroupError> {
        let group = roster
            .groups
            .remove(&id)
            .ok_or(ModelError::UnknownGroup(id))?;
        if !roster.dissolved.contains(&group.members) {
            roster.dissolved.push(group.members.clone());
        }
        sync_player_groups(roster);
        info!(group = %id, label = %group.label, "group dissolved");
        Ok(group)
    }

    pub fn group_of<'r>(&self, roster: &'r Roster, player: PlayerId) -> Option<&'r PlayerGroup> {
        roster.group_of(player)
    }
}

/// Connected components with at least `MIN_GROUP_SIZE` players, in id order.
fn components(adjacency: &Adjacency) -> Vec<BTreeSet<PlayerId>> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for start in adjacency.keys() {
        if !seen.insert(*start) {
            continue;
        }
        let mut component = BTreeSet::from([*start]);
        let mut queue = VecDeque::from([*start]);
        while let Some(node) = queue.pop_front() {
            for peer in adjacency.get(&node).into_iter().flatten() {
                if seen.insert(*peer) {
                    component.insert(*peer);
                    queue.push_back(*peer);
                }
            }
        }
        if component.len() >= MIN_GROUP_SIZE {
            out.push(component);
        }
    }
    out
}

/// The lowest-id previous group, not yet taken, that still has at least
/// `MIN_GROUP_SIZE` of its members in `component`.
fn shrunk_group<'p>(
    previous: &'p BTreeMap<GroupId, PlayerGroup>,
    component: &BTreeSet<PlayerId>,
    inherited: &BTreeSet<GroupId>,
) -> Option<&'p PlayerGroup> {
    previous.values().find(|group| {
        !inherited.contains(&group.id)
            && group.members.intersection(component).count() >= MIN_GROUP_SIZE
    })
}

/// True when `members` form one connected subgraph on their own.
fn is_connected(members: &BTreeSet<PlayerId>, adjacency: &Adjacency) -> bool {
    let Some(start) = members.first() else {
        return false;
    };
    let mut reached = BTreeSet::from([*start]);
    let mut queue = VecDeque::from([*start]);
    while let Some(node) = queue.pop_front() {
        for peer in adjacency.get(&node).into_iter().flatten() {
            if members.contains(peer) && reached.insert(*peer) {
                queue.push_back(*peer);
            }
        }
    }
    reached.len() == members.len()
}

/// Point every player's `group` field at the group holding it.
fn sync_player_groups(roster: &mut Roster) {
    let mut owner: BTreeMap<PlayerId, GroupId> = BTreeMap::new();
    for group in roster.groups.values() {
        for member in &group.members {
            owner.insert(*member, group.id);
        }
    }
    for player in &mut roster.players {
        player.group = owner.get(&player.id).copied();
    }
}

#[cfg(test)]
mod tests {
    use roster_model::{Gender, LeagueConfig, Player};

    use super::*;

    fn roster(requests: &[(&str, &[&str])]) -> Roster {
        let mut roster = Roster::new(LeagueConfig::default());
        for (name, wants) in requests {
            roster.push_player(
                Player::new(PlayerId::new(0), *name, Gender::Other, 5.0)
                    .with_teammate_requests(wants.iter().copied()),
            );
        }
        roster
    }

    fn ids(raw: &[u32]) -> BTreeSet<PlayerId> {
        raw.iter().copied().map(PlayerId::new).collect()
    }

    #[test]
    fn mutual_pairs_form_a_group() {
        let mut roster = roster(&[("Ann", &["Bob"]), ("Bob", &["Ann"]), ("Cal", &["Ann"])]);
        let report = GroupResolver::new().recompute(&mut roster, &WarningLedger::default());
        assert_eq!(report.created.len(), 1);
        let group = roster.group_of(PlayerId::new(0)).unwrap();
        assert_eq!(group.members, ids(&[0, 1]));
        assert_eq!(group.label, "A");
        assert_eq!(roster.players[2].group, None);
    }

    #[test]
    fn one_sided_request_is_not_enough() {
        let mut roster = roster(&[("Ann", &["Bob"]), ("Bob", &[])]);
        let report = GroupResolver::new().recompute(&mut roster, &WarningLedger::default());
        assert!(report.groups.is_empty());
    }

    #[test]
    fn request_naming_several_players_is_dropped() {
        let mut roster = roster(&[("Ann", &["Sam"]), ("Sam", &["Ann"]), ("sam", &["Ann"])]);
        let resolver = GroupResolver::new();
        let ledger = WarningLedger::default();
        assert!(resolver.resolved_requests(&roster, &ledger, PlayerId::new(0)).is_empty());
        assert_eq!(
            resolver.resolved_requests(&roster, &ledger, PlayerId::new(1)),
            ids(&[0])
        );
        assert!(resolver.recompute(&mut roster, &ledger).groups.is_empty());
    }

    #[test]
    fn chains_of_five_are_reported_not_grouped() {
        let mut roster = roster(&[
            ("A1", &["A2"]),
            ("A2", &["A1", "A3"]),
            ("A3", &["A2", "A4"]),
            ("A4", &["A3", "A5"]),
            ("A5", &["A4"]),
        ]);
        let report = GroupResolver::new().recompute(&mut roster, &WarningLedger::default());
        assert!(report.groups.is_empty());
        assert_eq!(report.oversized.len(), 1);
        assert_eq!(report.oversized[0].members, ids(&[0, 1, 2, 3, 4]));
        assert!(roster.players.iter().all(|p| p.group.is_none()));
    }

    #[test]
    fn identity_survives_recompute() {
        let mut roster = roster(&[("Ann", &["Bob"]), ("Bob", &["Ann"])]);
        let resolver = GroupResolver::new();
        let ledger = WarningLedger::default();
        let first = resolver.recompute(&mut roster, &ledger);
        let second = resolver.recompute(&mut roster, &ledger);
        assert_eq!(first.groups, second.groups);
        assert!(second.is_unchanged());
    }

    #[test]
    fn dissolved_groups_stay_dissolved_and_free_their_label() {
        let mut roster = roster(&[
            ("Ann", &["Bob"]),
            ("Bob", &["Ann"]),
            ("Cal", &["Dee"]),
            ("Dee", &["Cal"]),
        ]);
        let resolver = GroupResolver::new();
        let ledger = WarningLedger::default();
        resolver.recompute(&mut roster, &ledger);
        let first = roster.group_of(PlayerId::new(0)).unwrap().id;

        let removed = resolver.dissolve(&mut roster, first).unwrap();
        assert_eq!(removed.label, "A");
        resolver.recompute(&mut roster, &ledger);
        assert!(roster.group_of(PlayerId::new(0)).is_none());
        assert_eq!(roster.group_of(PlayerId::new(2)).unwrap().label, "B");

        // A new pair takes the freed label.
        roster.players[0].teammate_requests = vec!["Eve".into()];
        roster.push_player(
            Player::new(PlayerId::new(0), "Eve", Gender::F, 5.0).with_teammate_requests(["Ann"]),
        );
        let report = resolver.recompute(&mut roster, &ledger);
        assert_eq!(report.created.len(), 1);
        assert_eq!(roster.group(report.created[0]).unwrap().label, "A");
    }

    #[test]
    fn merge_respects_the_cap() {
        let mut roster = roster(&[
            ("Ann", &["Bob", "Cal"]),
            ("Bob", &["Ann"]),
            ("Cal", &["Ann"]),
            ("Dee", &["Eve"]),
            ("Eve", &["Dee"]),
        ]);
        let resolver = GroupResolver::new();
        let ledger = WarningLedger::default();
        resolver.recompute(&mut roster, &ledger);
        let trio = roster.group_of(PlayerId::new(0)).unwrap().id;
        let pair = roster.group_of(PlayerId::new(3)).unwrap().id;
        let before = roster.groups.clone();

        let err = resolver.merge(&mut roster, &ledger, trio, pair).unwrap_err();
        assert!(matches!(err, GroupError::MergeTooLarge { first_size: 3, second_size: 2, .. }));
        assert_eq!(roster.groups, before);
    }

    #[test]
    fn a_split_group_lives_on_in_its_first_pair() {
        let mut roster = roster(&[
            ("Ann", &["Bob"]),
            ("Bob", &["Ann", "Cal"]),
            ("Cal", &["Bob", "Dee"]),
            ("Dee", &["Cal"]),
        ]);
        let resolver = GroupResolver::new();
        let ledger = WarningLedger::default();
        resolver.recompute(&mut roster, &ledger);
        let four = roster.group_of(PlayerId::new(0)).unwrap().clone();
        assert_eq!(four.len(), 4);

        roster.players[1].teammate_requests = vec!["Ann".into()];
        let report = resolver.recompute(&mut roster, &ledger);
        assert_eq!(report.updated, vec![four.id]);
        assert_eq!(report.created.len(), 1);
        assert!(report.removed.is_empty());

        let kept = roster.group_of(PlayerId::new(0)).unwrap();
        assert_eq!(kept.id, four.id);
        assert_eq!(kept.label, "A");
        assert_eq!(kept.members, ids(&[0, 1]));
        let split = roster.group_of(PlayerId::new(2)).unwrap();
        assert_eq!(split.members, ids(&[2, 3]));
        assert_eq!(split.label, "B");
    }

    #[test]
    fn merge_inside_an_oversized_cluster_sticks() {
        let mut roster = roster(&[
            ("Ann", &["Bob"]),
            ("Bob", &["Ann"]),
            ("Cal", &["Dee"]),
            ("Dee", &["Cal"]),
        ]);
        let resolver = GroupResolver::new();
        let ledger = WarningLedger::default();
        resolver.recompute(&mut roster, &ledger);
        let ab = roster.group_of(PlayerId::new(0)).unwrap().id;
        let cd = roster.group_of(PlayerId::new(2)).unwrap().id;

        // Linking Bob to Cal and Dee to Eve makes one cluster of five.
        roster.players[1].teammate_requests = vec!["Ann".into(), "Cal".into()];
        roster.players[2].teammate_requests = vec!["Dee".into(), "Bob".into()];
        roster.players[3].teammate_requests = vec!["Cal".into(), "Eve".into()];
        roster.push_player(
            Player::new(PlayerId::new(0), "Eve", Gender::F, 5.0).with_teammate_requests(["Dee"]),
        );
        let report = resolver.recompute(&mut roster, &ledger);
        assert_eq!(report.oversized.len(), 1);
        assert!(report.oversized[0].is_refused_merge());
        assert_eq!(report.groups, vec![ab, cd]);

        // The higher id is absorbed; the lower keeps its slot.
        let merged = resolver.merge(&mut roster, &ledger, cd, ab).unwrap();
        assert_eq!(merged, ab);
        assert_eq!(roster.groups.len(), 1);
        let group = roster.group(ab).unwrap().clone();
        assert_eq!(group.members, ids(&[0, 1, 2, 3]));
        assert_eq!(group.label, "A");
        assert!(roster.players[..4].iter().all(|p| p.group == Some(ab)));
        assert_eq!(roster.players[4].group, None);

        let report = resolver.recompute(&mut roster, &ledger);
        assert!(report.is_unchanged());
        assert_eq!(report.groups, vec![ab]);
        assert_eq!(report.oversized[0].kept_groups, vec![ab]);
        assert!(!report.oversized[0].is_refused_merge());
        assert_eq!(roster.group(ab), Some(&group));
    }

    #[test]
    fn merge_requires_a_mutual_link() {
        let mut roster = roster(&[
            ("Ann", &["Bob"]),
            ("Bob", &["Ann"]),
            ("Dee", &["Eve"]),
            ("Eve", &["Dee"]),
        ]);
        let resolver = GroupResolver::new();
        let ledger = WarningLedger::default();
        resolver.recompute(&mut roster, &ledger);
        let ab = roster.group_of(PlayerId::new(0)).unwrap().id;
        let de = roster.group_of(PlayerId::new(2)).unwrap().id;
        assert_eq!(
            resolver.merge(&mut roster, &ledger, ab, de),
            Err(GroupError::NotLinked { first: ab, second: de })
        );
    }
}
