//! Skill sources — normalizes GitHub languages and résumé matches into one skill set.
//!
//! Skills are keyed by their case-folded name; the display spelling comes from the
//! career catalog when any career requires the skill, otherwise from the source.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Serialize, Serializer};

use crate::careers::catalog::CareerCatalog;
use crate::careers::CareerError;

/// Skills recognised in résumé text. Matched as case-insensitive substrings.
/// Names short enough to hide inside ordinary words live in `WORD_SKILLS`.
pub const SKILL_VOCABULARY: &[&str] = &[
    // Languages
    "Python",
    "Java",
    "JavaScript",
    "TypeScript",
    "C++",
    "C#",
    "Ruby",
    "PHP",
    "Kotlin",
    "Swift",
    "Dart",
    "Rust",
    "Scala",
    "SQL",
    "Objective-C",
    "Shell",
    "PowerShell",
    // Web
    "HTML",
    "CSS",
    "React",
    "Angular",
    "Vue",
    "Svelte",
    "Stylus",
    "Node.js",
    "Django",
    "Flask",
    "Spring Boot",
    "Flutter",
    // Data
    "Jupyter Notebook",
    "Pandas",
    "TensorFlow",
    "PyTorch",
    "PostgreSQL",
    "MongoDB",
    // Platforms
    "Docker",
    "Dockerfile",
    "Kubernetes",
    "AWS",
    "Azure",
    "GCP",
    "Linux",
    "Git",
];

/// Short skill names matched only as whole words with their exact casing,
/// so "go" in running text or the "r" in "React" never count.
pub const WORD_SKILLS: &[&str] = &["Go", "R"];

/// Alternate spellings, matched as substrings, and the skill each stands for.
pub const SKILL_ALIASES: &[(&str, &str)] = &[("Golang", "Go"), ("RStudio", "R")];

/// Canonical internal form of a skill name.
pub fn fold_skill(skill: &str) -> String {
    skill.trim().to_lowercase()
}

/// A set of skills with case-insensitive identity and preserved display casing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillSet {
    /// folded name → display name
    entries: BTreeMap<String, String>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a skill unless an equal (case-insensitive) one is present.
    /// Returns true when the skill was new. Blank names are ignored.
    pub fn insert(&mut self, display: &str) -> bool {
        let folded = fold_skill(display);
        if folded.is_empty() || self.entries.contains_key(&folded) {
            return false;
        }
        self.entries.insert(folded, display.trim().to_string());
        true
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.entries.contains_key(&fold_skill(skill))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display names, ordered by folded name.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = SkillSet::new();
        for skill in iter {
            set.insert(skill.as_ref());
        }
        set
    }
}

impl Serialize for SkillSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Unified skill set plus per-skill occurrence counts from GitHub.
#[derive(Debug, Clone, Default)]
pub struct AggregatedSkills {
    pub skills: SkillSet,
    /// folded name → repository count. Résumé-only skills are absent.
    weights: HashMap<String, u32>,
}

impl AggregatedSkills {
    /// Occurrence count used by weighted scoring. Skills with no count weigh 1.
    pub fn weight_of(&self, skill: &str) -> u32 {
        self.weights.get(&fold_skill(skill)).copied().unwrap_or(1)
    }

    /// Presence-only skills, every one weighing 1.
    #[cfg(test)]
    pub fn from_skills(skills: SkillSet) -> Self {
        Self {
            skills,
            weights: HashMap::new(),
        }
    }

    /// Attaches an explicit count to a skill already in the set.
    #[cfg(test)]
    pub fn with_weight(mut self, skill: &str, count: u32) -> Self {
        if self.skills.contains(skill) {
            self.weights.insert(fold_skill(skill), count);
        }
        self
    }
}

/// Unions GitHub languages and résumé skills into one set.
///
/// Display casing follows the catalog when any career requires the skill;
/// otherwise the spelling of the first source that supplied it is kept.
pub fn aggregate_skills(
    github_language_counts: &BTreeMap<String, u32>,
    resume_skills: &[String],
    catalog: &CareerCatalog,
) -> Result<AggregatedSkills, CareerError> {
    let mut aggregated = AggregatedSkills::default();

    for (language, count) in github_language_counts {
        let display = catalog.canonical_casing(language).unwrap_or(language);
        aggregated.skills.insert(display);
        let folded = fold_skill(language);
        if !folded.is_empty() {
            *aggregated.weights.entry(folded).or_insert(0) += count;
        }
    }

    for skill in resume_skills {
        let display = catalog.canonical_casing(skill).unwrap_or(skill);
        aggregated.skills.insert(display);
    }

    if aggregated.skills.is_empty() {
        return Err(CareerError::NoSkillsFound);
    }

    Ok(aggregated)
}

/// Finds vocabulary skills mentioned anywhere in the résumé text.
///
/// Results are re-cased to catalog spelling, deduplicated, and ordered as
/// vocabulary hits first, then aliases, then whole-word short names.
pub fn extract_resume_skills(text: &str, catalog: &CareerCatalog) -> Vec<String> {
    let haystack = text.to_lowercase();
    let words: HashSet<&str> = text
        .split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '&')))
        .filter(|w| !w.is_empty())
        .collect();

    let vocabulary_hits = SKILL_VOCABULARY
        .iter()
        .copied()
        .filter(|term| haystack.contains(&term.to_lowercase()));
    let alias_hits = SKILL_ALIASES
        .iter()
        .filter(|(alias, _)| haystack.contains(&alias.to_lowercase()))
        .map(|(_, skill)| *skill);
    let word_hits = WORD_SKILLS
        .iter()
        .copied()
        .filter(|skill| words.contains(skill));

    let mut seen = SkillSet::new();
    vocabulary_hits
        .chain(alias_hits)
        .chain(word_hits)
        .map(|skill| catalog.canonical_casing(skill).unwrap_or(skill))
        .filter(|skill| seen.insert(skill))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::careers::catalog::default_catalog;

    fn counts(pairs: &[(&str, u32)]) -> BTreeMap<String, u32> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_union_collapses_cross_source_duplicates() {
        let catalog = default_catalog().unwrap();
        let github = counts(&[("Python", 3), ("Go", 1)]);
        let resume = vec!["python".to_string(), "Docker".to_string()];

        let aggregated = aggregate_skills(&github, &resume, &catalog).unwrap();
        assert_eq!(aggregated.skills.len(), 3);
        assert!(aggregated.skills.contains("PYTHON"));
        assert!(aggregated.skills.contains("docker"));
    }

    #[test]
    fn test_disjoint_sources_union_size() {
        let catalog = default_catalog().unwrap();
        let github = counts(&[("Rust", 2)]);
        let resume = vec!["SQL".to_string(), "Kubernetes".to_string()];

        let aggregated = aggregate_skills(&github, &resume, &catalog).unwrap();
        assert_eq!(aggregated.skills.len(), 3);
    }

    #[test]
    fn test_display_casing_prefers_catalog() {
        let catalog = default_catalog().unwrap();
        let resume = vec!["javascript".to_string(), "kubernetes".to_string()];

        let aggregated = aggregate_skills(&BTreeMap::new(), &resume, &catalog).unwrap();
        let names: Vec<&str> = aggregated.skills.iter().collect();
        assert_eq!(names, vec!["JavaScript", "kubernetes"]);
    }

    #[test]
    fn test_weights_come_from_github_counts() {
        let catalog = default_catalog().unwrap();
        let github = counts(&[("Python", 4)]);
        let resume = vec!["SQL".to_string()];

        let aggregated = aggregate_skills(&github, &resume, &catalog).unwrap();
        assert_eq!(aggregated.weight_of("python"), 4);
        assert_eq!(aggregated.weight_of("SQL"), 1);
    }

    #[test]
    fn test_both_sources_empty_is_no_skills_found() {
        let catalog = default_catalog().unwrap();
        let err = aggregate_skills(&BTreeMap::new(), &[], &catalog).unwrap_err();
        assert_eq!(err, CareerError::NoSkillsFound);
    }

    #[test]
    fn test_blank_resume_skills_do_not_count() {
        let catalog = default_catalog().unwrap();
        let err = aggregate_skills(&BTreeMap::new(), &["  ".to_string()], &catalog).unwrap_err();
        assert_eq!(err, CareerError::NoSkillsFound);
    }

    #[test]
    fn test_extract_resume_skills_case_insensitive() {
        let catalog = default_catalog().unwrap();
        let text = "Built services in PYTHON and deployed them with docker on aws.";
        let skills = extract_resume_skills(text, &catalog);
        assert!(skills.contains(&"Python".to_string()));
        assert!(skills.contains(&"Docker".to_string()));
        assert!(skills.contains(&"AWS".to_string()));
        assert!(!skills.contains(&"Kotlin".to_string()));
    }

    #[test]
    fn test_extract_resume_skills_resolves_aliases_and_short_names() {
        let catalog = default_catalog().unwrap();
        let text = "Backend engineer: Golang microservices, Go, R";
        assert_eq!(extract_resume_skills(text, &catalog), vec!["Go", "R"]);
    }

    #[test]
    fn test_short_names_need_whole_exact_words() {
        let catalog = default_catalog().unwrap();
        let text = "Ready to go: React dashboards and R&D prototypes";
        assert_eq!(extract_resume_skills(text, &catalog), vec!["React"]);
    }

    #[test]
    fn test_golang_resume_scores_go_careers() {
        use crate::careers::scoring::{CareerScorer, MatchedCountScorer};

        let catalog = default_catalog().unwrap();
        let resume = extract_resume_skills("Five years of Golang services.", &catalog);
        let aggregated = aggregate_skills(&BTreeMap::new(), &resume, &catalog).unwrap();
        assert!(aggregated.skills.contains("Go"));

        let ranked = MatchedCountScorer.score_all(&aggregated, &catalog).unwrap();
        let careers: Vec<&str> = ranked.iter().map(|r| r.career.as_str()).collect();
        assert_eq!(careers, vec!["Backend Developer", "DevOps Engineer"]);
        assert_eq!(ranked[0].matched_skills, vec!["Go"]);
    }

    #[test]
    fn test_extract_resume_skills_empty_text() {
        let catalog = default_catalog().unwrap();
        assert!(extract_resume_skills("", &catalog).is_empty());
    }

    #[test]
    fn test_skill_set_insert_reports_novelty() {
        let mut set = SkillSet::new();
        assert!(set.insert("Go"));
        assert!(!set.insert("GO"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_skill_set_serializes_as_list() {
        let set: SkillSet = ["Rust", "Go"].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["Go","Rust"]"#);
    }
}
