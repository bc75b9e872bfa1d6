//! Human-readable audit trail of one equivalence run.
//!
//! Stages nest. Parallel sources each write to their own child trail, which
//! the orchestrator appends in a fixed order afterwards.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditPart {
    Text { text: String },
    Stage { name: String, parts: Vec<AuditPart> },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditTrail {
    parts: Vec<AuditPart>,
    #[serde(skip)]
    open: Vec<(String, Vec<AuditPart>)>,
}

impl AuditTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_stage(&mut self, name: impl Into<String>) -> &mut Self {
        self.open.push((name.into(), Vec::new()));
        self
    }

    pub fn append(&mut self, text: impl Into<String>) -> &mut Self {
        let part = AuditPart::Text { text: text.into() };
        self.current().push(part);
        self
    }

    /// Close the innermost stage. Extra calls are ignored.
    pub fn finish_stage(&mut self) -> &mut Self {
        if let Some((name, parts)) = self.open.pop() {
            self.current().push(AuditPart::Stage { name, parts });
        }
        self
    }

    /// Append another trail's content into the current stage.
    pub fn absorb(&mut self, mut other: AuditTrail) -> &mut Self {
        other.close_all();
        self.current().extend(other.parts);
        self
    }

    pub fn parts(&self) -> &[AuditPart] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty() && self.open.is_empty()
    }

    /// Close dangling stages, then return the finished trail.
    pub fn finish(mut self) -> AuditTrail {
        self.close_all();
        self
    }

    /// Indented plain-text rendering.
    pub fn render(&self) -> String {
        let mut out = String::new();
        render_parts(&self.parts, 0, &mut out);
        out
    }

    fn close_all(&mut self) {
        while !self.open.is_empty() {
            self.finish_stage();
        }
    }

    fn current(&mut self) -> &mut Vec<AuditPart> {
        match self.open.last_mut() {
            Some((_, parts)) => parts,
            None => &mut self.parts,
        }
    }
}

fn render_parts(parts: &[AuditPart], depth: usize, out: &mut String) {
    for part in parts {
        match part {
            AuditPart::Text { text } => {
                let _ = writeln!(out, "{:indent$}{}", "", text, indent = depth * 2);
            }
            AuditPart::Stage { name, parts } => {
                let _ = writeln!(out, "{:indent$}{}:", "", name, indent = depth * 2);
                render_parts(parts, depth + 1, out);
            }
        }
    }
}
