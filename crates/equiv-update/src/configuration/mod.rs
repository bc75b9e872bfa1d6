//! Per-(publisher, shape) pipeline configuration and the registry that
//! dispatches subjects to it.

pub mod profiles;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use equiv_core::config::{PublisherProfile, UpdateConfig};
use equiv_core::errors::UpdateError;
use equiv_core::traits::{
    IContentResolver, IEquivalenceGenerator, IEquivalenceScorer, IEquivalenceSummaryStore,
    ILookupEntryStore, ILookupWriter, IMessageSender, IResultHandler, IResultStore,
    IScheduleResolver, ISearchResolver,
};
use equiv_core::{Content, ContentShape, EquivResult, Publisher};
use equiv_results::EquivalenceResultBuilder;
use tracing::info;

use crate::handlers::AssertionMessenger;
use crate::outcome::UpdateOutcome;
use crate::updater::ContentEquivalenceUpdater;

/// Collaborators the built-in profiles draw on.
#[derive(Clone)]
pub struct UpdaterDependencies {
    pub content: Arc<dyn IContentResolver>,
    pub search: Arc<dyn ISearchResolver>,
    pub schedules: Arc<dyn IScheduleResolver>,
    pub lookups: Arc<dyn ILookupEntryStore>,
    pub summaries: Arc<dyn IEquivalenceSummaryStore>,
    pub writer: Arc<dyn ILookupWriter>,
    pub results: Arc<dyn IResultStore>,
    pub messages: Arc<dyn IMessageSender>,
}

/// Everything one updater runs. Immutable once built.
pub struct UpdaterConfiguration {
    pub name: String,
    pub generators: Vec<Box<dyn IEquivalenceGenerator>>,
    pub scorers: Vec<Box<dyn IEquivalenceScorer>>,
    pub builder: EquivalenceResultBuilder,
    pub handler: Box<dyn IResultHandler>,
    /// Sent after handling when the graph changed.
    pub messenger: Option<AssertionMessenger>,
    /// Never proposed, whatever the generators say.
    pub excluded_uris: BTreeSet<String>,
    pub excluded_ids: BTreeSet<u64>,
}

impl UpdaterConfiguration {
    pub fn new(
        name: impl Into<String>,
        builder: EquivalenceResultBuilder,
        handler: Box<dyn IResultHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            generators: Vec::new(),
            scorers: Vec::new(),
            builder,
            handler,
            messenger: None,
            excluded_uris: BTreeSet::new(),
            excluded_ids: BTreeSet::new(),
        }
    }

    pub fn with_generator(mut self, generator: Box<dyn IEquivalenceGenerator>) -> Self {
        self.generators.push(generator);
        self
    }

    pub fn with_scorer(mut self, scorer: Box<dyn IEquivalenceScorer>) -> Self {
        self.scorers.push(scorer);
        self
    }

    pub fn with_messenger(mut self, messenger: AssertionMessenger) -> Self {
        self.messenger = Some(messenger);
        self
    }

    pub fn excluding(
        mut self,
        uris: impl IntoIterator<Item = String>,
        ids: impl IntoIterator<Item = u64>,
    ) -> Self {
        self.excluded_uris.extend(uris);
        self.excluded_ids.extend(ids);
        self
    }

    pub fn excludes(&self, content: &Content) -> bool {
        self.excluded_uris.contains(&content.canonical_uri)
            || content.id.is_some_and(|id| self.excluded_ids.contains(&id))
    }
}

/// Updaters keyed by (publisher, shape).
#[derive(Default, Clone)]
pub struct EquivalenceUpdaters {
    updaters: BTreeMap<(Publisher, ContentShape), Arc<ContentEquivalenceUpdater>>,
}

impl EquivalenceUpdaters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from publisher profiles. An empty list means the
    /// built-in table.
    pub fn from_profiles(
        profiles: &[PublisherProfile],
        config: &UpdateConfig,
        deps: &UpdaterDependencies,
    ) -> EquivResult<Self> {
        let builtin;
        let profiles = if profiles.is_empty() {
            builtin = profiles::builtin_profiles();
            builtin.as_slice()
        } else {
            profiles
        };

        let mut updaters = Self::new();
        for profile in profiles {
            profile.validate()?;
            let publisher = Publisher::new(profile.publisher.as_str());
            for shape in ContentShape::ALL {
                if let Some(configuration) = profiles::configure(profile, shape, config, deps)? {
                    updaters.register(publisher.clone(), shape, configuration);
                }
            }
        }
        info!(updaters = updaters.len(), publishers = profiles.len(), "equivalence updaters configured");
        Ok(updaters)
    }

    pub fn register(&mut self, publisher: Publisher, shape: ContentShape, configuration: UpdaterConfiguration) {
        self.updaters
            .insert((publisher, shape), Arc::new(ContentEquivalenceUpdater::new(configuration)));
    }

    pub fn for_subject(&self, subject: &Content) -> Option<Arc<ContentEquivalenceUpdater>> {
        self.updaters
            .get(&(subject.publisher.clone(), subject.shape))
            .cloned()
    }

    pub fn handles(&self, subject: &Content) -> bool {
        self.updaters
            .contains_key(&(subject.publisher.clone(), subject.shape))
    }

    /// Run the updater configured for `subject`.
    pub fn update(&self, subject: Arc<Content>) -> EquivResult<UpdateOutcome> {
        let updater = self.for_subject(&subject).ok_or_else(|| UpdateError::NoConfiguration {
            publisher: subject.publisher.to_string(),
            shape: subject.shape.to_string(),
        })?;
        updater.run(subject)
    }

    pub fn publishers(&self) -> BTreeSet<Publisher> {
        self.updaters.keys().map(|(p, _)| p.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.updaters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updaters.is_empty()
    }
}
