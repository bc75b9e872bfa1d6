//! Built-in pipelines and the publisher table that selects between them.
//!
//! Each function builds one immutable [`UpdaterConfiguration`]. Which one a
//! publisher gets for a shape is data: a [`PublisherProfile`] row.

use chrono::Duration;
use equiv_core::config::{
    ContainerProfile, HierarchyMode, ItemProfile, PublisherProfile, UpdateConfig,
};
use equiv_core::constants::sources;
use equiv_core::traits::IResultHandler;
use equiv_core::{ContentShape, EquivResult, Publisher, Score};
use equiv_results::combining::{
    AdditiveCombiner, NullScoreAwareAveragingCombiner, RequiredScoreFilteringCombiner,
};
use equiv_results::extraction::{
    AllOverOrEqualThresholdExtractor, ContinueUntilOneWorksExtractor, MultipleCandidateExtractor,
    NTimesAboveNextBestExtractor,
};
use equiv_results::filtering::{
    ConjunctiveFilter, ContainerHierarchyFilter, FilmYearFilter, MediaTypeFilter,
    MinimumScoreFilter, PlaceholderFilter, PublisherFilter, SpecializationFilter,
    UnpublishedContentFilter,
};
use equiv_results::EquivalenceResultBuilder;
use equiv_strategies::{
    AliasResolvingGenerator, BroadcastMatchingGenerator, BroadcastTitleSubsetScorer,
    ContainerCandidatesItemGenerator, ContainerChildGenerator, ContainerHierarchyScorer,
    DescriptionMatchingScorer, DescriptionTitleMatchingScorer, ExactTitleGenerator,
    FilmEquivalenceGenerator, ScalingGenerator, SequenceItemScorer, TitleMatchingScorer,
    TitleSearchGenerator,
};

use super::{UpdaterConfiguration, UpdaterDependencies};
use crate::handlers::{
    AssertionMessenger, DelegatingHandler, EpisodeFilteringHandler, EpisodeMatchingHandler,
    LookupWritingHandler, ResultWritingHandler, SummaryWritingHandler,
};

const CONTAINER_SHAPES: [ContentShape; 2] =
    [ContentShape::TopLevelContainer, ContentShape::NonTopLevelContainer];

/// The table used when the configuration names no publishers.
pub fn builtin_profiles() -> Vec<PublisherProfile> {
    let mut pa = PublisherProfile::new(
        "pressassociation.com",
        &["bbc.co.uk", "itv.com", "channel4.com", "five.tv"],
    );
    pa.non_top_level_container = ContainerProfile::Standard;

    let mut amazon = PublisherProfile::new("amazon.co.uk", &["pressassociation.com"]);
    amazon.item = ItemProfile::Vod;
    amazon.top_level_container = ContainerProfile::Vod;
    amazon.hierarchy = HierarchyMode::Relaxed;

    let mut rovi = PublisherProfile::new("rovicorp.com", &["pressassociation.com"]);
    rovi.item = ItemProfile::Film;
    rovi.top_level_container = ContainerProfile::Disabled;

    let mut bt = PublisherProfile::new("bt.com", &["pressassociation.com"]);
    bt.item = ItemProfile::Broadcast;
    bt.top_level_container = ContainerProfile::Disabled;
    bt.null_score_channels = vec!["skysports1".into(), "skysports2".into(), "btsport1".into()];

    let mut youview = PublisherProfile::new("youview.com", &["pressassociation.com"]);
    youview.item = ItemProfile::Alias;
    youview.top_level_container = ContainerProfile::Alias;
    youview.alias_namespaces = vec![
        vec!["pa:episode".into(), "gb:pa:episode".into()],
        vec!["pa:brand".into(), "gb:pa:brand".into()],
    ];

    vec![pa, amazon, rovi, bt, youview]
}

/// Configuration for `shape` under `profile`, or `None` when disabled.
pub fn configure(
    profile: &PublisherProfile,
    shape: ContentShape,
    config: &UpdateConfig,
    deps: &UpdaterDependencies,
) -> EquivResult<Option<UpdaterConfiguration>> {
    let configuration = match shape {
        ContentShape::Item => match profile.item {
            ItemProfile::Standard => Some(standard_item(profile, config, deps)),
            ItemProfile::Vod => Some(vod_item(profile, config, deps)),
            ItemProfile::Alias => Some(alias_item(profile, config, deps)?),
            ItemProfile::Film => Some(film_item(profile, config, deps)),
            ItemProfile::Broadcast => Some(broadcast_item(profile, config, deps)?),
            ItemProfile::Disabled => None,
        },
        ContentShape::TopLevelContainer => container(profile, profile.top_level_container, shape, config, deps)?,
        ContentShape::NonTopLevelContainer => {
            container(profile, profile.non_top_level_container, shape, config, deps)?
        }
    };
    Ok(configuration.map(|c| c.with_messenger(messenger(profile, deps))))
}

fn container(
    profile: &PublisherProfile,
    kind: ContainerProfile,
    shape: ContentShape,
    config: &UpdateConfig,
    deps: &UpdaterDependencies,
) -> EquivResult<Option<UpdaterConfiguration>> {
    Ok(match kind {
        ContainerProfile::Standard => Some(standard_container(profile, shape, config, deps)),
        ContainerProfile::Vod => Some(vod_container(profile, shape, config, deps)),
        ContainerProfile::Alias => Some(alias_container(profile, shape, config, deps)?),
        ContainerProfile::Disabled => None,
    })
}

fn targets(profile: &PublisherProfile) -> Vec<Publisher> {
    profile.targets.iter().map(|t| Publisher::new(t.as_str())).collect()
}

fn messenger(profile: &PublisherProfile, deps: &UpdaterDependencies) -> AssertionMessenger {
    let mut publishers = targets(profile);
    publishers.push(Publisher::new(profile.publisher.as_str()));
    AssertionMessenger::new(deps.messages.clone(), publishers)
}

fn writing_chain(profile: &PublisherProfile, deps: &UpdaterDependencies) -> Vec<Box<dyn IResultHandler>> {
    vec![
        Box::new(LookupWritingHandler::new(
            deps.lookups.clone(),
            deps.writer.clone(),
            targets(profile),
        )),
        Box::new(ResultWritingHandler::new(deps.results.clone())),
        Box::new(SummaryWritingHandler::new(deps.summaries.clone())),
    ]
}

fn item_handler(profile: &PublisherProfile, deps: &UpdaterDependencies) -> Box<dyn IResultHandler> {
    Box::new(EpisodeFilteringHandler::new(
        Box::new(DelegatingHandler::new(writing_chain(profile, deps))),
        deps.summaries.clone(),
        profile.hierarchy,
    ))
}

fn item_filter(profile: &PublisherProfile, config: &UpdateConfig, deps: &UpdaterDependencies) -> ConjunctiveFilter {
    ConjunctiveFilter::new(vec![
        Box::new(MinimumScoreFilter::new(config.minimum_score)),
        Box::new(MediaTypeFilter),
        Box::new(SpecializationFilter::with_film_episode_year_tolerance(config.film_year_tolerance)),
        Box::new(FilmYearFilter::new(config.film_year_tolerance)),
        Box::new(PublisherFilter::new(targets(profile))),
        Box::new(UnpublishedContentFilter),
        Box::new(ContainerHierarchyFilter::new(deps.summaries.clone(), profile.hierarchy)),
    ])
}

fn container_filter(profile: &PublisherProfile, config: &UpdateConfig) -> ConjunctiveFilter {
    ConjunctiveFilter::new(vec![
        Box::new(MinimumScoreFilter::new(config.minimum_score)),
        Box::new(MediaTypeFilter),
        Box::new(SpecializationFilter::new()),
        Box::new(PublisherFilter::new(targets(profile))),
        Box::new(UnpublishedContentFilter),
        Box::new(PlaceholderFilter),
    ])
}

fn title_search(
    profile: &PublisherProfile,
    shapes: &[ContentShape],
    score: f64,
    config: &UpdateConfig,
    deps: &UpdaterDependencies,
) -> TitleSearchGenerator {
    TitleSearchGenerator::new(deps.search.clone(), targets(profile), score)
        .for_shapes(shapes)
        .with_limit(config.title_search_limit)
        .with_similarity_floor(config.title_similarity_floor)
}

fn name(profile: &PublisherProfile, shape: ContentShape, kind: &str) -> String {
    format!("{} {} ({})", profile.publisher, shape, kind)
}

/// Broadcast and title search, averaged, clear winner per publisher.
pub fn standard_item(
    profile: &PublisherProfile,
    config: &UpdateConfig,
    deps: &UpdaterDependencies,
) -> UpdaterConfiguration {
    let builder = EquivalenceResultBuilder::new(
        Box::new(NullScoreAwareAveragingCombiner::new()),
        Box::new(item_filter(profile, config, deps)),
        Box::new(NTimesAboveNextBestExtractor::new(config.n_times_greater)),
    )
    .with_scope(config.extraction_scope);

    UpdaterConfiguration::new(
        name(profile, ContentShape::Item, "standard"),
        builder,
        item_handler(profile, deps),
    )
    .with_generator(Box::new(BroadcastMatchingGenerator::new(
        deps.schedules.clone(),
        targets(profile),
        Duration::minutes(config.broadcast_flexibility_mins),
    )))
    .with_generator(Box::new(title_search(
        profile,
        &[ContentShape::Item],
        config.item_title_match_score,
        config,
        deps,
    )))
    .with_generator(Box::new(ContainerCandidatesItemGenerator::new(
        deps.summaries.clone(),
        deps.content.clone(),
    )))
    .with_scorer(Box::new(TitleMatchingScorer::new(config.item_title_match_score)))
    .with_scorer(Box::new(SequenceItemScorer::new(config.sequence_match_score)))
}

/// On-demand catalogues carry no schedule, so matching rests on titles and
/// episode position. Split records of one programme are accepted together.
pub fn vod_item(
    profile: &PublisherProfile,
    config: &UpdateConfig,
    deps: &UpdaterDependencies,
) -> UpdaterConfiguration {
    let extractor = ContinueUntilOneWorksExtractor::new(vec![
        Box::new(NTimesAboveNextBestExtractor::new(config.n_times_greater)),
        Box::new(MultipleCandidateExtractor::new(config.multiple_candidate_band)),
    ]);
    let builder = EquivalenceResultBuilder::new(
        Box::new(AdditiveCombiner::new()),
        Box::new(item_filter(profile, config, deps)),
        Box::new(extractor),
    )
    .with_scope(config.extraction_scope);

    UpdaterConfiguration::new(
        name(profile, ContentShape::Item, "vod"),
        builder,
        item_handler(profile, deps),
    )
    .with_generator(Box::new(title_search(
        profile,
        &[ContentShape::Item],
        config.item_title_match_score,
        config,
        deps,
    )))
    .with_generator(Box::new(ContainerCandidatesItemGenerator::new(
        deps.summaries.clone(),
        deps.content.clone(),
    )))
    .with_scorer(Box::new(TitleMatchingScorer::new(config.item_title_match_score)))
    .with_scorer(Box::new(SequenceItemScorer::new(config.sequence_match_score)))
}

/// Films by title and release year. Short or unusually spelt titles also
/// get an exact-title search, confirmed by the title scorer.
pub fn film_item(
    profile: &PublisherProfile,
    config: &UpdateConfig,
    deps: &UpdaterDependencies,
) -> UpdaterConfiguration {
    let builder = EquivalenceResultBuilder::new(
        Box::new(AdditiveCombiner::new()),
        Box::new(item_filter(profile, config, deps)),
        Box::new(NTimesAboveNextBestExtractor::new(config.n_times_greater)),
    )
    .with_scope(config.extraction_scope);

    UpdaterConfiguration::new(
        name(profile, ContentShape::Item, "film"),
        builder,
        item_handler(profile, deps),
    )
    .with_generator(Box::new(
        FilmEquivalenceGenerator::new(deps.search.clone(), targets(profile))
            .with_limit(config.title_search_limit)
            .with_year_tolerance(config.film_year_tolerance),
    ))
    .with_generator(Box::new(
        ExactTitleGenerator::new(deps.search.clone(), targets(profile))
            .for_shapes(&[ContentShape::Item])
            .matching_specialization(),
    ))
    .with_scorer(Box::new(TitleMatchingScorer::new(config.item_title_match_score)))
}

/// Schedule-only publishers: the broadcast slot proposes, titles and
/// descriptions confirm. A title mismatch counts against the candidate.
pub fn broadcast_item(
    profile: &PublisherProfile,
    config: &UpdateConfig,
    deps: &UpdaterDependencies,
) -> EquivResult<UpdaterConfiguration> {
    let builder = EquivalenceResultBuilder::new(
        Box::new(NullScoreAwareAveragingCombiner::new()),
        Box::new(item_filter(profile, config, deps)),
        Box::new(NTimesAboveNextBestExtractor::new(config.n_times_greater)),
    )
    .with_scope(config.extraction_scope);
    let title_scorer = BroadcastTitleSubsetScorer::new(
        deps.content.clone(),
        Score::Real(-1.0),
        config.broadcast_title_subset_percent,
    )?
    .with_null_channels(profile.null_score_channels.iter().cloned());

    Ok(UpdaterConfiguration::new(
        name(profile, ContentShape::Item, "broadcast"),
        builder,
        item_handler(profile, deps),
    )
    .with_generator(Box::new(BroadcastMatchingGenerator::new(
        deps.schedules.clone(),
        targets(profile),
        Duration::minutes(config.broadcast_flexibility_mins),
    )))
    .with_scorer(Box::new(title_scorer))
    .with_scorer(Box::new(
        DescriptionTitleMatchingScorer::new().with_divisor(config.description_title_divisor),
    ))
    .with_scorer(Box::new(DescriptionMatchingScorer::with_threshold(config.description_overlap))))
}

fn alias_builder(profile: &PublisherProfile, config: &UpdateConfig) -> EquivalenceResultBuilder {
    EquivalenceResultBuilder::new(
        Box::new(AdditiveCombiner::new()),
        Box::new(ConjunctiveFilter::new(vec![
            Box::new(MinimumScoreFilter::new(config.minimum_score)),
            Box::new(PublisherFilter::new(targets(profile))),
            Box::new(PlaceholderFilter),
        ])),
        Box::new(AllOverOrEqualThresholdExtractor::new(config.alias_match_score)),
    )
}

fn alias_generator(
    profile: &PublisherProfile,
    config: &UpdateConfig,
    deps: &UpdaterDependencies,
) -> EquivResult<AliasResolvingGenerator> {
    Ok(AliasResolvingGenerator::new(
        deps.lookups.clone(),
        deps.content.clone(),
        targets(profile),
        config.alias_match_score,
    )
    .with_namespace_groups(&profile.alias_namespaces)?)
}

/// Shared identifiers only.
pub fn alias_item(
    profile: &PublisherProfile,
    config: &UpdateConfig,
    deps: &UpdaterDependencies,
) -> EquivResult<UpdaterConfiguration> {
    Ok(UpdaterConfiguration::new(
        name(profile, ContentShape::Item, "alias"),
        alias_builder(profile, config),
        Box::new(DelegatingHandler::new(writing_chain(profile, deps))),
    )
    .with_generator(Box::new(alias_generator(profile, config, deps)?)))
}

/// Title search plus propagation from the children, accepted only when the
/// title scorer agrees.
pub fn standard_container(
    profile: &PublisherProfile,
    shape: ContentShape,
    config: &UpdateConfig,
    deps: &UpdaterDependencies,
) -> UpdaterConfiguration {
    let combiner = RequiredScoreFilteringCombiner::new(
        Box::new(NullScoreAwareAveragingCombiner::new()),
        sources::TITLE,
    );
    let builder = EquivalenceResultBuilder::new(
        Box::new(combiner),
        Box::new(container_filter(profile, config)),
        Box::new(NTimesAboveNextBestExtractor::new(config.n_times_greater)),
    )
    .with_scope(config.extraction_scope);

    let mut handlers = writing_chain(profile, deps);
    handlers.insert(
        1,
        Box::new(EpisodeMatchingHandler::new(
            deps.content.clone(),
            deps.summaries.clone(),
            deps.lookups.clone(),
            deps.writer.clone(),
            targets(profile),
        )),
    );

    UpdaterConfiguration::new(
        name(profile, shape, "standard"),
        builder,
        Box::new(DelegatingHandler::new(handlers)),
    )
    .with_generator(Box::new(title_search(
        profile,
        &CONTAINER_SHAPES,
        config.container_title_match_score,
        config,
        deps,
    )))
    .with_generator(Box::new(ScalingGenerator::new(
        Box::new(ContainerChildGenerator::new(deps.summaries.clone(), deps.content.clone())),
        config.container_child_scale,
    )))
    .with_scorer(Box::new(TitleMatchingScorer::new(config.container_title_match_score)))
    .with_scorer(Box::new(ContainerHierarchyScorer::new(deps.content.clone())))
}

/// Title search without child propagation: on-demand episodes are too
/// sparse to vote. Descriptions back the title up.
pub fn vod_container(
    profile: &PublisherProfile,
    shape: ContentShape,
    config: &UpdateConfig,
    deps: &UpdaterDependencies,
) -> UpdaterConfiguration {
    let combiner = RequiredScoreFilteringCombiner::new(
        Box::new(NullScoreAwareAveragingCombiner::new()),
        sources::TITLE,
    );
    let builder = EquivalenceResultBuilder::new(
        Box::new(combiner),
        Box::new(container_filter(profile, config)),
        Box::new(NTimesAboveNextBestExtractor::new(config.n_times_greater)),
    )
    .with_scope(config.extraction_scope);

    UpdaterConfiguration::new(
        name(profile, shape, "vod"),
        builder,
        Box::new(DelegatingHandler::new(writing_chain(profile, deps))),
    )
    .with_generator(Box::new(title_search(
        profile,
        &CONTAINER_SHAPES,
        config.container_title_match_score,
        config,
        deps,
    )))
    .with_scorer(Box::new(TitleMatchingScorer::new(config.container_title_match_score)))
    .with_scorer(Box::new(ContainerHierarchyScorer::new(deps.content.clone())))
    .with_scorer(Box::new(DescriptionMatchingScorer::with_threshold(config.description_overlap)))
}

pub fn alias_container(
    profile: &PublisherProfile,
    shape: ContentShape,
    config: &UpdateConfig,
    deps: &UpdaterDependencies,
) -> EquivResult<UpdaterConfiguration> {
    Ok(UpdaterConfiguration::new(
        name(profile, shape, "alias"),
        alias_builder(profile, config),
        Box::new(DelegatingHandler::new(writing_chain(profile, deps))),
    )
    .with_generator(Box::new(alias_generator(profile, config, deps)?)))
}
