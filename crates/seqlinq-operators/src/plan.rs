//! Operator planning surfaces: `Evaluation` and `OpPlan`.
//!
//! Plans are descriptive only. They make the eager operators visible to the
//! caller (`Query::explain`) since buffering changes when errors surface.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Evaluation {
    /// Produces output while pulling, one element at a time.
    Streaming,
    /// Drains its (primary or secondary) input before the first output.
    Buffering,
}

/// Operator plan: name, evaluation mode, parameters, and the upstream plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpPlan {
    pub name: String,
    pub evaluation: Evaluation,

    /// Short human-readable parameter summary (e.g. `count=6`).
    pub detail: Option<String>,

    pub input: Option<Box<OpPlan>>,
}

impl OpPlan {
    pub fn new(name: impl Into<String>, evaluation: Evaluation) -> Self {
        Self {
            name: name.into(),
            evaluation,
            detail: None,
            input: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_input(mut self, input: OpPlan) -> Self {
        self.input = Some(Box::new(input));
        self
    }

    /// Nodes from this one down to the source.
    pub fn nodes(&self) -> impl Iterator<Item = &OpPlan> {
        std::iter::successors(Some(self), |p| p.input.as_deref())
    }

    /// True when no node in the chain buffers.
    pub fn is_streaming(&self) -> bool {
        self.nodes().all(|p| p.evaluation == Evaluation::Streaming)
    }

    /// Names of the buffering nodes, closest to the terminal first.
    pub fn buffering_ops(&self) -> Vec<&str> {
        self.nodes()
            .filter(|p| p.evaluation == Evaluation::Buffering)
            .map(|p| p.name.as_str())
            .collect()
    }
}

impl fmt::Display for OpPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (depth, node) in self.nodes().enumerate() {
            if depth > 0 {
                writeln!(f)?;
            }
            write!(f, "{:indent$}{}", "", node.name, indent = depth * 2)?;
            if let Some(detail) = &node.detail {
                write!(f, "({detail})")?;
            }
            if node.evaluation == Evaluation::Buffering {
                f.write_str(" [buffering]")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OpPlan {
        OpPlan::new("take", Evaluation::Streaming)
            .with_detail("count=2")
            .with_input(
                OpPlan::new("order_by", Evaluation::Buffering)
                    .with_detail("keys=1")
                    .with_input(OpPlan::new("source", Evaluation::Streaming)),
            )
    }

    #[test]
    fn test_render_tree() {
        assert_eq!(
            sample().to_string(),
            "take(count=2)\n  order_by(keys=1) [buffering]\n    source"
        );
    }

    #[test]
    fn test_buffering_ops() {
        let plan = sample();
        assert!(!plan.is_streaming());
        assert_eq!(plan.buffering_ops(), vec!["order_by"]);
        assert_eq!(plan.nodes().count(), 3);
    }

    #[test]
    fn test_plan_serializes() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["input"]["evaluation"], "buffering");
        let back: OpPlan = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample());
    }
}
