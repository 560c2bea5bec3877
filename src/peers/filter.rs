/// Expiration policy for peer blocks
use chrono::NaiveDate;
use serde::Serialize;

use super::block::PeerBlock;

/// Age cutoff evaluated against an explicit reference date
///
/// A peer is expired when `today - enrollment_date > threshold_days`, so a
/// peer enrolled exactly `threshold_days` ago is still retained. Both the
/// config filter and the ledger reconciler go through [`ExpiryPolicy::is_expired`]
/// so a peer kept in the config is never marked expired in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    pub today: NaiveDate,
    pub threshold_days: u32,
}

/// What a run will do with a peer block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Within the threshold
    Retain,
    /// Past the threshold, will be removed
    Prune,
    /// No enrollment date, never expires
    Exempt,
}

impl ExpiryPolicy {
    pub fn new(today: NaiveDate, threshold_days: u32) -> Self {
        Self {
            today,
            threshold_days,
        }
    }

    /// Whole days between `date` and today; negative for future dates
    pub fn age_in_days(&self, date: NaiveDate) -> i64 {
        self.today.signed_duration_since(date).num_days()
    }

    pub fn is_expired(&self, date: NaiveDate) -> bool {
        self.age_in_days(date) > i64::from(self.threshold_days)
    }

    /// Decision for a peer block, `None` for non-peer blocks
    pub fn decide(&self, block: &PeerBlock) -> Option<Decision> {
        if !block.is_peer() {
            return None;
        }
        Some(match block.enrollment_date() {
            None => Decision::Exempt,
            Some(date) if self.is_expired(date) => Decision::Prune,
            Some(_) => Decision::Retain,
        })
    }

    /// True only for peer blocks with an enrollment date past the threshold
    pub fn should_prune(&self, block: &PeerBlock) -> bool {
        self.decide(block) == Some(Decision::Prune)
    }
}

/// Keep every block that is not an expired peer, preserving order
pub fn retain_unexpired<'a, I>(blocks: I, policy: &ExpiryPolicy) -> Vec<&'a PeerBlock>
where
    I: IntoIterator<Item = &'a PeerBlock>,
{
    blocks
        .into_iter()
        .filter(|block| !policy.should_prune(block))
        .collect()
}

/// Split blocks into `(retained, pruned)`, both in original order
pub fn partition_expired<'a, I>(
    blocks: I,
    policy: &ExpiryPolicy,
) -> (Vec<&'a PeerBlock>, Vec<&'a PeerBlock>)
where
    I: IntoIterator<Item = &'a PeerBlock>,
{
    blocks
        .into_iter()
        .partition(|block| !policy.should_prune(block))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peers::parse_blocks;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, crate::peers::DATE_FORMAT).unwrap()
    }

    fn peer(name: &str, key: &str, added_on: &str) -> String {
        format!("### Client {name}\n# Added on: {added_on}\n[Peer]\nPublicKey = {key}\nAllowedIPs = 10.0.0.2/32")
    }

    fn policy() -> ExpiryPolicy {
        ExpiryPolicy::new(date("2024-03-01"), 30)
    }

    #[test]
    fn test_old_peer_is_dropped() {
        let blocks = parse_blocks(&peer("old", "a", "2024-01-01")).unwrap();
        assert!(retain_unexpired(&blocks, &policy()).is_empty());
    }

    #[test]
    fn test_recent_peer_is_retained() {
        let blocks = parse_blocks(&peer("new", "b", "2024-02-15")).unwrap();
        assert_eq!(retain_unexpired(&blocks, &policy()).len(), 1);
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        let policy = policy();
        // 2024 is a leap year: 2024-01-31 is exactly 30 days before 2024-03-01
        let exactly = date("2024-01-31");
        let one_more = date("2024-01-30");

        assert_eq!(policy.age_in_days(exactly), 30);
        assert!(!policy.is_expired(exactly));
        assert_eq!(policy.age_in_days(one_more), 31);
        assert!(policy.is_expired(one_more));
    }

    #[test]
    fn test_future_date_is_retained() {
        let policy = policy();
        assert_eq!(policy.age_in_days(date("2024-03-05")), -4);
        assert!(!policy.is_expired(date("2024-03-05")));
    }

    #[test]
    fn test_non_peer_block_passes_through_regardless_of_date() {
        let text = "[Interface]\n# Added on: 2000-01-01\nAddress = 10.0.0.1/24";
        let blocks = parse_blocks(text).unwrap();

        assert_eq!(policy().decide(&blocks[0]), None);
        assert_eq!(retain_unexpired(&blocks, &policy()).len(), 1);
    }

    #[test]
    fn test_peer_without_date_is_exempt() {
        let blocks = parse_blocks("[Peer]\nPublicKey = k").unwrap();

        assert_eq!(policy().decide(&blocks[0]), Some(Decision::Exempt));
        assert_eq!(retain_unexpired(&blocks, &policy()).len(), 1);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let text = [
            "[Interface]\nAddress = 10.0.0.1/24".to_string(),
            peer("a", "ka", "2024-01-01"),
            peer("b", "kb", "2024-02-15"),
            peer("c", "kc", "2024-01-31"),
            peer("d", "kd", "2023-12-01"),
        ]
        .join("\n\n");
        let blocks = parse_blocks(&text).unwrap();
        let policy = policy();

        let once = retain_unexpired(&blocks, &policy);
        let twice = retain_unexpired(once.iter().copied(), &policy);

        assert_eq!(once.len(), 3);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_partition_preserves_order() {
        let text = [
            peer("a", "ka", "2024-01-01"),
            peer("b", "kb", "2024-02-15"),
            peer("c", "kc", "2023-12-01"),
            peer("d", "kd", "2024-02-20"),
        ]
        .join("\n\n");
        let blocks = parse_blocks(&text).unwrap();

        let (retained, pruned) = partition_expired(&blocks, &policy());

        fn names(blocks: &[&PeerBlock]) -> Vec<String> {
            blocks
                .iter()
                .map(|b| b.client_name().unwrap().to_string())
                .collect()
        }

        assert_eq!(names(&retained), vec!["b", "d"]);
        assert_eq!(names(&pruned), vec!["a", "c"]);
    }
}
