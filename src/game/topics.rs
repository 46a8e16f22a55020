use rand::seq::IndexedRandom;
use rand::Rng;

pub const DEFAULT_TOPICS: &[&str] = &[
    "東京タワー",
    "富士山",
    "寿司",
    "桜",
    "新幹線",
    "ラーメン",
    "温泉",
    "アニメ",
];

/// Secret words a round can draw from
#[derive(Debug, Clone)]
pub struct TopicPool {
    topics: Vec<String>,
}

impl TopicPool {
    /// Blank entries are dropped; an empty pool falls back to the defaults.
    pub fn new(topics: Vec<String>) -> Self {
        let topics: Vec<String> = topics
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if topics.is_empty() {
            Self::default()
        } else {
            Self { topics }
        }
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.topics
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| DEFAULT_TOPICS[0].to_string())
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

impl Default for TopicPool {
    fn default() -> Self {
        Self {
            topics: DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_blank_topics_fall_back_to_defaults() {
        let pool = TopicPool::new(vec!["  ".to_string(), String::new()]);
        assert_eq!(pool.len(), DEFAULT_TOPICS.len());
    }

    #[test]
    fn test_draw_from_configured() {
        let pool = TopicPool::new(vec![" Tokyo Tower ".to_string()]);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(pool.draw(&mut rng), "Tokyo Tower");
    }
}
