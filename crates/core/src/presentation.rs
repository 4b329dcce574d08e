//! Presentation Adapter
//!
//! Projects a validated [`ExamAnalysis`] into the grouped view shown to the
//! student: the syllabus breakdown (unit -> topic), the key insights, and the
//! tiered study plan. This is a pure projection. Order is kept exactly as the
//! backend produced it because it carries the intended prioritization within
//! a unit.

use crate::analysis::{Depth, ExamAnalysis, Priority, SyllabusTopic, SyllabusUnit};
use serde::Serialize;
use std::fmt;

pub const SYLLABUS_HEADING: &str = "Syllabus & Weightage Breakdown";
pub const INSIGHTS_HEADING: &str = "Key Exam Insights";
pub const STUDY_PLAN_HEADING: &str = "High-ROI Study Plan";

/// The three study-plan buckets, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StudyTier {
    MasterNow,
    DeepDive,
    QuickRevision,
}

impl StudyTier {
    pub const ALL: [StudyTier; 3] = [
        StudyTier::MasterNow,
        StudyTier::DeepDive,
        StudyTier::QuickRevision,
    ];

    pub fn heading(&self) -> &'static str {
        match self {
            StudyTier::MasterNow => "Master Immediately",
            StudyTier::DeepDive => "Deep Dive Focus",
            StudyTier::QuickRevision => "Quick Revision",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicView {
    pub name: String,
    pub priority: Priority,
    /// e.g. "High Priority".
    pub priority_label: String,
    pub depth: Depth,
    pub reasoning: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitView {
    pub title: String,
    pub topics: Vec<TopicView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TierView {
    pub tier: StudyTier,
    pub heading: &'static str,
    pub topics: Vec<String>,
}

/// The rendered dashboard for one analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisView {
    pub units: Vec<UnitView>,
    pub insights: Vec<String>,
    pub tiers: Vec<TierView>,
}

fn topic_view(topic: &SyllabusTopic) -> TopicView {
    TopicView {
        name: topic.name().to_string(),
        priority: topic.priority(),
        priority_label: format!("{} Priority", topic.priority()),
        depth: topic.depth(),
        reasoning: topic.reasoning().to_string(),
    }
}

fn unit_view(unit: &SyllabusUnit) -> UnitView {
    UnitView {
        title: unit.title().to_string(),
        topics: unit.topics().iter().map(topic_view).collect(),
    }
}

/// Renders an analysis into its grouped view.
pub fn render(analysis: &ExamAnalysis) -> AnalysisView {
    let plan = analysis.study_plan();
    let tiers = StudyTier::ALL
        .into_iter()
        .map(|tier| {
            let topics = match tier {
                StudyTier::MasterNow => plan.master_now(),
                StudyTier::DeepDive => plan.deep_dive(),
                StudyTier::QuickRevision => plan.quick_revision(),
            };
            TierView {
                tier,
                heading: tier.heading(),
                topics: topics.to_vec(),
            }
        })
        .collect();

    AnalysisView {
        units: analysis.syllabus().iter().map(unit_view).collect(),
        insights: analysis.key_insights().to_vec(),
        tiers,
    }
}

/// Plain-text dashboard for terminals.
impl fmt::Display for AnalysisView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", SYLLABUS_HEADING)?;
        writeln!(f, "{}", "=".repeat(SYLLABUS_HEADING.len()))?;
        for unit in &self.units {
            writeln!(f)?;
            writeln!(f, "{}", unit.title.to_uppercase())?;
            for topic in &unit.topics {
                writeln!(
                    f,
                    "  - {} [{} | {}]",
                    topic.name, topic.depth, topic.priority_label
                )?;
                writeln!(f, "    \"{}\"", topic.reasoning)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "{}", INSIGHTS_HEADING)?;
        writeln!(f, "{}", "=".repeat(INSIGHTS_HEADING.len()))?;
        for insight in &self.insights {
            writeln!(f, "  * {}", insight)?;
        }

        writeln!(f)?;
        writeln!(f, "{}", STUDY_PLAN_HEADING)?;
        writeln!(f, "{}", "=".repeat(STUDY_PLAN_HEADING.len()))?;
        for tier in &self.tiers {
            if tier.topics.is_empty() {
                writeln!(f, "  {}: (none)", tier.heading)?;
            } else {
                writeln!(f, "  {}: {}", tier.heading, tier.topics.join(", "))?;
            }
        }
        Ok(())
    }
}
