use equiv_core::traits::IEquivalenceGenerator;
use equiv_core::{AuditTrail, Content, EquivResult, ScoredCandidates};

/// Multiplies a delegate's real scores by a constant. Keeps the delegate's name.
pub struct ScalingGenerator {
    delegate: Box<dyn IEquivalenceGenerator>,
    factor: f64,
}

impl ScalingGenerator {
    pub fn new(delegate: Box<dyn IEquivalenceGenerator>, factor: f64) -> Self {
        Self { delegate, factor }
    }
}

impl IEquivalenceGenerator for ScalingGenerator {
    fn name(&self) -> &str {
        self.delegate.name()
    }

    fn generate(&self, subject: &Content, trail: &mut AuditTrail) -> EquivResult<ScoredCandidates> {
        let raw = self.delegate.generate(subject, trail)?;
        trail.append(format!("scores scaled by {}", self.factor));
        Ok(raw.map_scores(|s| s.scale(self.factor)))
    }
}
