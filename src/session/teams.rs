// Partition allocator: balanced random team splits.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::protocol::BlockedReason;

use super::roster::Roster;

/// Smallest allowed team count.
pub const MIN_TEAMS: usize = 2;
/// Largest allowed team count.
pub const MAX_TEAMS: usize = 8;

/// A full, non-overlapping split of the roster into teams. Team sizes
/// differ by at most one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub teams: Vec<Vec<String>>,
}

impl Partition {
    pub fn team_count(&self) -> usize {
        self.teams.len()
    }
}

/// Clamp a requested team count to `[2, min(8, max(2, roster_len))]`.
pub fn clamp_team_count(requested: usize, roster_len: usize) -> usize {
    let upper = MAX_TEAMS.min(roster_len.max(MIN_TEAMS));
    requested.clamp(MIN_TEAMS, upper)
}

/// Split the full roster into `requested` balanced teams.
///
/// Shuffles the roster with a uniform permutation (ignoring the used set;
/// team assignment is independent of the draw cycle), then deals element
/// `i` to team `i mod teamCount`. Each call is a fresh, independent
/// partition.
pub fn partition<R: Rng>(
    roster: &Roster,
    requested: usize,
    rng: &mut R,
) -> Result<Partition, BlockedReason> {
    if roster.is_empty() {
        return Err(BlockedReason::EmptyRoster);
    }

    let team_count = clamp_team_count(requested, roster.len());
    let mut shuffled: Vec<String> = roster.names().to_vec();
    shuffled.shuffle(rng);

    let mut teams: Vec<Vec<String>> = vec![Vec::new(); team_count];
    for (i, name) in shuffled.into_iter().enumerate() {
        teams[i % team_count].push(name);
    }

    Ok(Partition { teams })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn roster_of(names: &[&str]) -> Roster {
        let mut roster = Roster::new();
        roster.import_lines(&names.join("\n"));
        roster
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    #[test]
    fn partition_covers_roster_exactly_once() {
        let roster = roster_of(&["A", "B", "C", "D", "E", "F", "G"]);
        let result = partition(&roster, 3, &mut rng()).unwrap();

        let mut all: Vec<String> = result.teams.iter().flatten().cloned().collect();
        all.sort();
        let mut expected: Vec<String> = roster.names().to_vec();
        expected.sort();
        assert_eq!(all, expected);
    }

    #[test]
    fn team_sizes_differ_by_at_most_one() {
        let roster = roster_of(&["A", "B", "C", "D", "E", "F", "G"]);
        let result = partition(&roster, 3, &mut rng()).unwrap();

        let sizes: Vec<usize> = result.teams.iter().map(Vec::len).collect();
        let max = *sizes.iter().max().unwrap();
        let min = *sizes.iter().min().unwrap();
        assert!(max - min <= 1, "sizes: {sizes:?}");
    }

    #[test]
    fn three_names_two_teams_sized_two_and_one() {
        let roster = roster_of(&["A", "B", "C"]);
        let result = partition(&roster, 2, &mut rng()).unwrap();

        let mut sizes: Vec<usize> = result.teams.iter().map(Vec::len).collect();
        sizes.sort();
        assert_eq!(sizes, vec![1, 2]);

        let mut all: Vec<String> = result.teams.iter().flatten().cloned().collect();
        all.sort();
        assert_eq!(all, vec!["A", "B", "C"]);
    }

    #[test]
    fn team_count_clamped_to_bounds() {
        assert_eq!(clamp_team_count(1, 10), 2);
        assert_eq!(clamp_team_count(0, 10), 2);
        assert_eq!(clamp_team_count(9, 10), 8);
        assert_eq!(clamp_team_count(5, 3), 3);
        assert_eq!(clamp_team_count(4, 1), 2);
    }

    #[test]
    fn oversized_request_yields_clamped_team_count() {
        let roster = roster_of(&["A", "B", "C"]);
        let result = partition(&roster, 99, &mut rng()).unwrap();
        assert_eq!(result.team_count(), 3);
    }

    #[test]
    fn used_names_are_still_assigned() {
        let mut roster = roster_of(&["A", "B", "C", "D"]);
        roster.mark_used(&["A".to_string(), "B".to_string()]);
        let result = partition(&roster, 2, &mut rng()).unwrap();

        let all: Vec<&String> = result.teams.iter().flatten().collect();
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn empty_roster_reports_empty() {
        let roster = Roster::new();
        assert_eq!(
            partition(&roster, 2, &mut rng()),
            Err(BlockedReason::EmptyRoster)
        );
    }

    #[test]
    fn each_call_is_independent() {
        let roster = roster_of(&["A", "B", "C", "D", "E", "F", "G", "H"]);
        let mut rng = StdRng::seed_from_u64(5);

        // Two consecutive calls on the same rng should (almost surely)
        // produce different assignments for an 8-name roster.
        let first = partition(&roster, 2, &mut rng).unwrap();
        let mut differed = false;
        for _ in 0..10 {
            if partition(&roster, 2, &mut rng).unwrap() != first {
                differed = true;
                break;
            }
        }
        assert!(differed);
    }
}
