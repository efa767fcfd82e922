//! Target selection: resolve the container set a chaos command acts on.

use rand::seq::SliceRandom;
use regex::Regex;
use tracing::{debug, warn};

use super::client::RuntimeClient;
use super::container::Container;
use super::error::{ChaosError, ChaosResult};

/// Sentinel prefix that marks `pattern` as an RE2-style regex rather than a
/// literal name list residue. Preserved from the upstream control surface.
pub const RE2_PREFIX: &str = "re2:";

/// `{ names, pattern, limit }` target filter, as described in the spec.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub names: Vec<String>,
    pub pattern: String,
    pub limit: usize,
}

impl Filter {
    pub fn new(names: Vec<String>, pattern: String, limit: usize) -> Self {
        Filter {
            names,
            pattern,
            limit,
        }
    }

    /// Strip the `re2:` sentinel if present, returning the compiled pattern.
    fn compiled_pattern(&self) -> ChaosResult<Option<Regex>> {
        if self.pattern.is_empty() {
            return Ok(None);
        }
        let residue = self.pattern.strip_prefix(RE2_PREFIX).unwrap_or(&self.pattern);
        Regex::new(residue)
            .map(Some)
            .map_err(|e| ChaosError::InvalidParameter(format!("bad pattern '{}': {}", self.pattern, e)))
    }
}

/// Resolve the ordered container set matching `filter` against `client`.
///
/// Policy: pattern takes priority over names; if neither is set,
/// "match all" is implied. `limit` truncates after filtering, in the order
/// the runtime client returned containers.
pub async fn list_targets(
    client: &dyn RuntimeClient,
    filter: &Filter,
) -> ChaosResult<Vec<Container>> {
    debug!(names = ?filter.names, pattern = %filter.pattern, limit = filter.limit, "listing matching containers");

    let all = client
        .list_containers()
        .await
        .map_err(|e| ChaosError::TargetResolution(e.to_string()))?;

    let regex = filter.compiled_pattern()?;

    let mut matched: Vec<Container> = if let Some(re) = regex {
        all.into_iter().filter(|c| re.is_match(&c.name)).collect()
    } else if !filter.names.is_empty() {
        all.into_iter()
            .filter(|c| filter.names.iter().any(|n| n == &c.name))
            .collect()
    } else {
        all
    };

    if filter.limit > 0 && matched.len() > filter.limit {
        matched.truncate(filter.limit);
    }

    if matched.is_empty() {
        warn!("no containers matched filter");
    }

    Ok(matched)
}

/// If `random` is set, replace `containers` with a single uniformly-picked
/// element (or leave it empty if it already was).
pub fn apply_random_pick(containers: Vec<Container>, random: bool) -> Vec<Container> {
    if !random || containers.is_empty() {
        return containers;
    }
    debug!("selecting single random container");
    let mut rng = rand::thread_rng();
    containers
        .choose(&mut rng)
        .cloned()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chaos::testutil::{containers, MockClient};

    #[tokio::test]
    async fn match_all_when_filter_empty() {
        let client = MockClient::with_containers(containers(&["c1", "c2", "c3"]));
        let got = list_targets(&client, &Filter::default()).await.unwrap();
        assert_eq!(got.len(), 3);
    }

    #[tokio::test]
    async fn names_only_match() {
        let client = MockClient::with_containers(containers(&["c1", "c2", "c3"]));
        let f = Filter::new(vec!["c1".into(), "c3".into()], String::new(), 0);
        let got = list_targets(&client, &f).await.unwrap();
        assert_eq!(got.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(), vec!["c1", "c3"]);
    }

    #[tokio::test]
    async fn pattern_overrides_names() {
        let client = MockClient::with_containers(containers(&["c1", "c2", "other"]));
        let f = Filter::new(vec!["other".into()], "re2:^c".into(), 0);
        let got = list_targets(&client, &f).await.unwrap();
        assert_eq!(got.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(), vec!["c1", "c2"]);
    }

    #[tokio::test]
    async fn limit_bounds_result() {
        let client = MockClient::with_containers(containers(&["c1", "c2", "c3"]));
        let f = Filter::new(vec![], String::new(), 2);
        let got = list_targets(&client, &f).await.unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].name, "c1");
        assert_eq!(got[1].name, "c2");
    }

    #[tokio::test]
    async fn filter_idempotence() {
        let client = MockClient::with_containers(containers(&["c1", "c2", "c3"]));
        let f = Filter::new(vec!["c1".into(), "c2".into()], String::new(), 0);
        let once = list_targets(&client, &f).await.unwrap();
        // Re-filtering an already-filtered set with the same filter is a fixed point.
        let client2 = MockClient::with_containers(once.clone());
        let twice = list_targets(&client2, &f).await.unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn random_pick_empty_stays_empty() {
        assert!(apply_random_pick(vec![], true).is_empty());
    }

    #[test]
    fn random_pick_singleton() {
        let got = apply_random_pick(containers(&["c1", "c2", "c3"]), true);
        assert_eq!(got.len(), 1);
    }

    #[test]
    fn bad_pattern_rejected() {
        let f = Filter::new(vec![], "re2:[".into(), 0);
        assert!(f.compiled_pattern().is_err());
    }
}
