//! Validated Exam Analysis Model
//!
//! These types are the hand-off artifact between the response decoder and the
//! presentation layer. They can only be obtained through
//! [`crate::decoder::decode`] (or by deserializing a document that satisfies the
//! same contract), so every value downstream of validation is structurally
//! sound: no optional fields, no open-ended enum strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How often a topic shows up in past papers, as judged by the reasoning backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Every accepted literal, in the order they are declared to the backend.
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// The exact wire literal for this priority.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The depth of preparation a topic calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Depth {
    Basic,
    Conceptual,
    #[serde(rename = "Numerical/Derivation")]
    Numerical,
    Application,
}

impl Depth {
    /// Every accepted literal, in the order they are declared to the backend.
    pub const ALL: [Depth; 4] = [
        Depth::Basic,
        Depth::Conceptual,
        Depth::Numerical,
        Depth::Application,
    ];

    /// The exact wire literal for this depth.
    pub fn as_str(&self) -> &'static str {
        match self {
            Depth::Basic => "Basic",
            Depth::Conceptual => "Conceptual",
            Depth::Numerical => "Numerical/Derivation",
            Depth::Application => "Application",
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single syllabus topic with its assessed priority and depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyllabusTopic {
    name: String,
    priority: Priority,
    depth: Depth,
    reasoning: String,
}

impl SyllabusTopic {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn depth(&self) -> Depth {
        self.depth
    }

    /// The backend's justification, usually citing how often the topic was asked.
    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }
}

/// A unit (chapter, module) of the syllabus and its topics in backend order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyllabusUnit {
    title: String,
    topics: Vec<SyllabusTopic>,
}

impl SyllabusUnit {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn topics(&self) -> &[SyllabusTopic] {
        &self.topics
    }
}

/// Topic names bucketed by recommended study strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    master_now: Vec<String>,
    deep_dive: Vec<String>,
    quick_revision: Vec<String>,
}

impl StudyPlan {
    pub fn master_now(&self) -> &[String] {
        &self.master_now
    }

    pub fn deep_dive(&self) -> &[String] {
        &self.deep_dive
    }

    pub fn quick_revision(&self) -> &[String] {
        &self.quick_revision
    }
}

/// The complete, validated result of one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamAnalysis {
    syllabus: Vec<SyllabusUnit>,
    key_insights: Vec<String>,
    study_plan: StudyPlan,
}

impl ExamAnalysis {
    pub fn syllabus(&self) -> &[SyllabusUnit] {
        &self.syllabus
    }

    pub fn key_insights(&self) -> &[String] {
        &self.key_insights
    }

    pub fn study_plan(&self) -> &StudyPlan {
        &self.study_plan
    }

    /// Total number of topics across all units.
    pub fn topic_count(&self) -> usize {
        self.syllabus.iter().map(|unit| unit.topics.len()).sum()
    }
}
