use chrono::NaiveDate;
use tenant_note::listings::{
    filter_listings, Coordinates, DealType, FilterCommand, FilterState, Grade, Heating,
    HeatingFuel, HeatingMethod, HousingType, Listing, ListingCatalog, ListingDraft, ListingId,
    ListingPipeline, MarkerClusterer, Price, ScoreFactor, ScoringEngine, SizeBucket, SubScores,
    SwotTag,
};

fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid reference date")
}

fn listing_at(id: u32, lat: f64, lng: f64, scores: SubScores) -> Listing {
    ListingDraft {
        id: ListingId(id),
        name: format!("Gwanak {id}"),
        housing_type: HousingType::Yh,
        deal_type: DealType::Monthly,
        coordinates: Coordinates::new(lat, lng),
        price: Price {
            deposit: 3_000,
            monthly: 50,
        },
        size: 14,
        slope: 4,
        noise_level: 55,
        heating: Heating {
            method: HeatingMethod::Individual,
            fuel: HeatingFuel::CityGas,
        },
        scores,
        listed_on: reference_date(),
    }
    .finalize(&ScoringEngine::standard())
}

#[test]
fn uniform_ninety_scores_reach_grade_a_and_curated_strength() {
    let listing = listing_at(0, 37.4842, 126.9296, SubScores::uniform(90));

    assert!((listing.final_score() - 90.0).abs() < 1e-9);
    assert_eq!(listing.grade(), Grade::A);
    assert!(listing.swot().strengths.contains(&SwotTag::Curated));
}

#[test]
fn grade_boundaries_are_exact() {
    let engine = ScoringEngine::standard();
    let cases = [
        (85.0, Grade::A),
        (84.999, Grade::B),
        (55.0, Grade::B),
        (54.999, Grade::C),
        (20.0, Grade::C),
        (19.999, Grade::D),
    ];
    for (score, grade) in cases {
        assert_eq!(engine.grade_for(score), grade, "score {score}");
    }
}

#[test]
fn generated_catalog_keeps_every_invariant() {
    let catalog = ListingCatalog::generate(300, 2024, reference_date());
    let engine = ScoringEngine::standard();

    for listing in catalog.listings() {
        for factor in ScoreFactor::ordered() {
            assert!(listing.scores().get(factor) <= 100);
        }
        let expected = engine.final_score(listing.scores());
        assert!((listing.final_score() - expected).abs() < 1e-9);
        assert_eq!(listing.grade(), engine.grade_for(expected));

        let swot = listing.swot();
        assert!(!swot.strengths.is_empty());
        assert!(!swot.weaknesses.is_empty());
        assert!(!swot.opportunities.is_empty());
        assert!(!swot.threats.is_empty());
    }
}

#[test]
fn refiltering_a_conforming_view_is_stable() {
    let catalog = ListingCatalog::generate(200, 77, reference_date());
    let mut state = FilterState::default();
    state.apply(FilterCommand::SetSizeBucket {
        size_bucket: SizeBucket::From10To20,
    });
    state.apply(FilterCommand::ToggleHousingType {
        housing_type: HousingType::Dd,
    });
    state.budget.rent_max = "150".to_string();

    let first: Vec<Listing> = filter_listings(catalog.listings(), &state)
        .into_iter()
        .cloned()
        .collect();
    let second: Vec<Listing> = filter_listings(&first, &state).into_iter().cloned().collect();
    assert_eq!(first, second);

    for listing in &first {
        assert_ne!(listing.housing_type(), HousingType::Dd);
        assert!((10..20).contains(&listing.size()));
        assert!(listing.price().monthly <= 150);
    }
}

#[test]
fn impossible_budget_is_an_empty_view_not_an_error() {
    let catalog = ListingCatalog::generate(50, 5, reference_date());
    let mut state = FilterState::default();
    state.budget.deposit_max = "1".to_string();

    let run = ListingPipeline::default().run(&catalog, &state);
    assert!(run.filtered().is_empty());
    assert!(run.markers().is_empty());
}

#[test]
fn clustering_separates_distinct_points_and_merges_shared_keys() {
    let listings = vec![
        listing_at(0, 37.48420, 126.92960, SubScores::uniform(70)),
        listing_at(1, 37.48420, 126.92961, SubScores::uniform(70)),
        listing_at(2, 37.4850, 126.9300, SubScores::uniform(70)),
        listing_at(3, 37.484200001, 126.929600002, SubScores::uniform(70)),
    ];

    let index = MarkerClusterer::new().cluster(&listings);
    assert_eq!(index.len(), 3);
    let lead = &index.groups()[0];
    assert_eq!(lead.len(), 2);
    assert_eq!(lead.badge().as_deref(), Some("+1"));
    assert_eq!(index.groups()[2].lead().id(), ListingId(2));
    assert_eq!(index.groups()[2].badge(), None);

    let coarse = MarkerClusterer::with_precision(4).cluster(&listings);
    assert_eq!(coarse.len(), 2);
    assert_eq!(coarse.groups()[0].badge().as_deref(), Some("+2"));
}

#[test]
fn zero_listings_generate_an_empty_catalog() {
    let catalog = ListingCatalog::generate(0, 1, reference_date());
    assert!(catalog.is_empty());
    let run = ListingPipeline::default().run(&catalog, &FilterState::default());
    assert_eq!(run.page(20).total, 0);
}
