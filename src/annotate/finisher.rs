// Finisher: flatten the last stage's annotations into plain strings.

use super::traits::Annotation;

#[derive(Debug, Clone)]
pub struct Finisher {
    /// Skip annotations whose result is empty
    pub drop_empty: bool,
}

impl Default for Finisher {
    fn default() -> Self {
        Self { drop_empty: true }
    }
}

impl Finisher {
    pub fn finish(&self, annotations: Vec<Annotation>) -> Vec<String> {
        annotations
            .into_iter()
            .map(|a| a.result)
            .filter(|r| !(self.drop_empty && r.is_empty()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_flattens_results() {
        let out = Finisher::default().finish(vec![
            Annotation::new(0, 3, "rain"),
            Annotation::new(5, 5, ""),
            Annotation::new(7, 12, "farmer"),
        ]);
        assert_eq!(out, vec!["rain", "farmer"]);
    }

    #[test]
    fn test_finish_can_keep_empty() {
        let finisher = Finisher { drop_empty: false };
        let out = finisher.finish(vec![Annotation::new(0, 0, "")]);
        assert_eq!(out, vec![""]);
    }
}
