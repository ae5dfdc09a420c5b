use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The accumulated `mapping[PublishedLineName][LineRef]` table built from the
/// BODS SIRI-VM feed: every distinct `[origin, destination]` pair seen for a
/// line reference, in first-seen order.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PublishedLineMapping {
    pub lines: BTreeMap<String, BTreeMap<String, Vec<[String; 2]>>>,
}

impl PublishedLineMapping {
    pub fn record(
        &mut self,
        published_line_name: &str,
        line_ref: &str,
        origin: String,
        destination: String,
    ) {
        let pair = [origin, destination];
        let by_line_ref = self.lines.entry(published_line_name.to_string()).or_default();
        let pairs = by_line_ref.entry(line_ref.to_string()).or_default();
        if !pairs.contains(&pair) {
            pairs.push(pair);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deduplicates_repeated_origin_destination_pairs() {
        let mut mapping = PublishedLineMapping::default();
        mapping.record("X1", "LINE:1", "A".to_string(), "B".to_string());
        mapping.record("X1", "LINE:1", "A".to_string(), "B".to_string());
        mapping.record("X1", "LINE:1", "B".to_string(), "A".to_string());

        let pairs = &mapping.lines["X1"]["LINE:1"];
        assert_eq!(pairs.len(), 2);
    }
}
