use equiv_core::candidates::ScoredCandidate;
use equiv_core::content::Specialization;
use equiv_core::traits::IEquivalenceFilter;
use equiv_core::{AuditTrail, Content};

use super::reject;

/// Video matches video, audio matches audio.
#[derive(Debug, Default, Clone, Copy)]
pub struct MediaTypeFilter;

impl IEquivalenceFilter for MediaTypeFilter {
    fn name(&self) -> &str {
        "media type"
    }

    fn accepts(&self, candidate: &ScoredCandidate, subject: &Content, trail: &mut AuditTrail) -> bool {
        let passes = candidate.candidate.media_type == subject.media_type;
        if !passes {
            reject(trail, candidate, self.name(), "media type differs");
        }
        passes
    }
}

/// Rejects mismatched specializations.
///
/// Broadcasters often list films as TV episodes; with a year tolerance a
/// film/TV pair whose years agree closely enough is let through.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpecializationFilter {
    film_episode_year_tolerance: Option<u16>,
}

impl SpecializationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_film_episode_year_tolerance(years: u16) -> Self {
        Self {
            film_episode_year_tolerance: Some(years),
        }
    }

    fn compatible(&self, subject: &Content, candidate: &Content) -> bool {
        use Specialization::{Film, Tv};
        match (subject.specialization, candidate.specialization) {
            (None, _) | (_, None) => true,
            (Some(a), Some(b)) if a == b => true,
            (Some(Film), Some(Tv)) | (Some(Tv), Some(Film)) => {
                match (self.film_episode_year_tolerance, subject.year, candidate.year) {
                    (Some(tolerance), Some(a), Some(b)) => a.abs_diff(b) <= tolerance,
                    _ => false,
                }
            }
            _ => false,
        }
    }
}

impl IEquivalenceFilter for SpecializationFilter {
    fn name(&self) -> &str {
        "specialization"
    }

    fn accepts(&self, candidate: &ScoredCandidate, subject: &Content, trail: &mut AuditTrail) -> bool {
        let passes = self.compatible(subject, &candidate.candidate);
        if !passes {
            reject(
                trail,
                candidate,
                self.name(),
                &format!(
                    "{:?} vs {:?}",
                    subject.specialization, candidate.candidate.specialization
                ),
            );
        }
        passes
    }
}

/// Films released more than `tolerance` years apart are different films.
#[derive(Debug, Clone, Copy)]
pub struct FilmYearFilter {
    tolerance: u16,
}

impl FilmYearFilter {
    pub fn new(tolerance: u16) -> Self {
        Self { tolerance }
    }
}

impl IEquivalenceFilter for FilmYearFilter {
    fn name(&self) -> &str {
        "film year"
    }

    fn accepts(&self, candidate: &ScoredCandidate, subject: &Content, trail: &mut AuditTrail) -> bool {
        let films = subject.specialization == Some(Specialization::Film)
            && candidate.candidate.specialization == Some(Specialization::Film);
        let passes = match (films, subject.year, candidate.candidate.year) {
            (true, Some(a), Some(b)) => a.abs_diff(b) <= self.tolerance,
            _ => true,
        };
        if !passes {
            reject(trail, candidate, self.name(), "release years too far apart");
        }
        passes
    }
}
