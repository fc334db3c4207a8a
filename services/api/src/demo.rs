use crate::infra::{
    parse_date, parse_deal_type, parse_hash_scheme, parse_housing_type, parse_size_bucket,
    parse_view_mode,
};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use tenant_note::error::AppError;
use tenant_note::listings::{
    format_price, write_grid, AreaUnit, BudgetInput, DealType, FilterState, Grade, HousingType,
    Listing, ListingCatalog, ListingPipeline, MarkerClusterer, ScoringEngine, SizeBucket,
    DEFAULT_VISIBLE_COUNT,
};
use tenant_note::regions::{
    fetch_regions, read_indicators, AdminCode, GradeAssessor, GradeHashScheme,
    RegionGradeSimulator, ViewMode,
};

const DEFAULT_SEED: u64 = 42;

/// Listing source plus the search panel options shared by report and export.
#[derive(Args, Debug, Clone)]
pub(crate) struct FilterArgs {
    /// Number of listings to generate
    #[arg(long, default_value_t = 100)]
    pub(crate) count: usize,
    /// Generator seed
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub(crate) seed: u64,
    /// Reference date for listing dates (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Housing type to include (APT, OP, YH, DD). Repeatable; defaults to all.
    #[arg(long = "housing-type", value_parser = parse_housing_type)]
    pub(crate) housing_types: Vec<HousingType>,
    /// Deal type (monthly or jeonse)
    #[arg(long, value_parser = parse_deal_type, default_value = "monthly")]
    pub(crate) deal_type: DealType,
    /// Size bucket (all, under10, 10to20, over30)
    #[arg(long, value_parser = parse_size_bucket, default_value = "all")]
    pub(crate) size: SizeBucket,
    /// Minimum deposit in 10,000 KRW
    #[arg(long)]
    pub(crate) deposit_min: Option<String>,
    /// Maximum deposit in 10,000 KRW
    #[arg(long)]
    pub(crate) deposit_max: Option<String>,
    /// Minimum monthly rent in 10,000 KRW
    #[arg(long)]
    pub(crate) rent_min: Option<String>,
    /// Maximum monthly rent in 10,000 KRW
    #[arg(long)]
    pub(crate) rent_max: Option<String>,
    /// Show areas in square metres instead of pyeong
    #[arg(long)]
    pub(crate) square_metres: bool,
}

impl FilterArgs {
    pub(crate) fn state(&self) -> FilterState {
        let mut state = FilterState {
            deal_type: self.deal_type,
            size_bucket: self.size,
            budget: BudgetInput {
                deposit_min: self.deposit_min.clone().unwrap_or_default(),
                deposit_max: self.deposit_max.clone().unwrap_or_default(),
                rent_min: self.rent_min.clone().unwrap_or_default(),
                rent_max: self.rent_max.clone().unwrap_or_default(),
            },
            ..FilterState::default()
        };
        if !self.housing_types.is_empty() {
            state.housing_types = self.housing_types.iter().copied().collect();
        }
        state
    }

    pub(crate) fn catalog(&self) -> ListingCatalog {
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        ListingCatalog::generate(self.count, self.seed, today)
    }

    pub(crate) fn area_unit(&self) -> AreaUnit {
        if self.square_metres {
            AreaUnit::SquareMetre
        } else {
            AreaUnit::Pyeong
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ListingReportArgs {
    #[command(flatten)]
    pub(crate) filters: FilterArgs,
    /// Listings shown before the "more" marker
    #[arg(long, default_value_t = DEFAULT_VISIBLE_COUNT)]
    pub(crate) visible: usize,
    /// Print SWOT tags under each listing
    #[arg(long)]
    pub(crate) swot: bool,
    /// Decimal places used when grouping markers
    #[arg(long, default_value_t = 5)]
    pub(crate) precision: u32,
}

#[derive(Args, Debug)]
pub(crate) struct ListingExportArgs {
    #[command(flatten)]
    pub(crate) filters: FilterArgs,
    /// Destination CSV file. Defaults to stdout.
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct RegionGradeArgs {
    /// View mode (total, security, building, comfort, infra, traffic, environment)
    #[arg(long, value_parser = parse_view_mode, default_value = "total")]
    pub(crate) view_mode: ViewMode,
    /// Single admin code to grade
    #[arg(long)]
    pub(crate) admin_code: Option<String>,
    /// Stored grade for the single admin code
    #[arg(long, default_value = "C")]
    pub(crate) base_grade: String,
    /// GeoJSON file whose regions should all be graded
    #[arg(long)]
    pub(crate) geojson: Option<PathBuf>,
    /// Hash scheme (fnv1a or char_sum)
    #[arg(long, value_parser = parse_hash_scheme, default_value = "fnv1a")]
    pub(crate) hash: GradeHashScheme,
}

#[derive(Args, Debug)]
pub(crate) struct RegionAssessArgs {
    /// CSV with adm_cd,adm_nm,cctv_count,harmful_count,viol_rate,avg_age
    #[arg(long)]
    pub(crate) indicators: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Generator seed
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Number of listings to generate
    #[arg(long)]
    pub(crate) count: Option<usize>,
    /// Reference date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_listing_report(args: ListingReportArgs) -> Result<(), AppError> {
    let ListingReportArgs {
        filters,
        visible,
        swot,
        precision,
    } = args;

    let catalog = filters.catalog();
    let state = filters.state();
    let pipeline = ListingPipeline::new(MarkerClusterer::with_precision(precision));
    let run = pipeline.run(&catalog, &state);
    let page = run.page(visible);
    let unit = filters.area_unit();

    println!(
        "Listing report (seed {}, {} generated, {} match, {} markers)",
        filters.seed,
        catalog.len(),
        page.total,
        run.markers().len()
    );
    print_grade_distribution(run.filtered().iter().copied());

    if page.items.is_empty() {
        println!("No listings match the current filters.");
        return Ok(());
    }

    println!("\nListings:");
    for listing in &page.items {
        render_listing(listing, unit, swot);
    }
    if page.has_more {
        println!(
            "  ... {} more not shown (raise --visible)",
            page.total - page.items.len()
        );
    }

    let clustered: Vec<_> = run
        .markers()
        .iter()
        .filter_map(|group| group.badge().map(|badge| (group.key(), badge)))
        .collect();
    if !clustered.is_empty() {
        println!("\nShared markers:");
        for (key, badge) in clustered {
            println!("  - {key} {badge}");
        }
    }

    Ok(())
}

pub(crate) fn run_listing_export(args: ListingExportArgs) -> Result<(), AppError> {
    let ListingExportArgs { filters, output } = args;

    let catalog = filters.catalog();
    let state = filters.state();
    let run = ListingPipeline::default().run(&catalog, &state);
    let listings = run.filtered().iter().copied();

    let rows = match output {
        Some(path) => {
            let file = File::create(&path)?;
            let rows = write_grid(file, listings, filters.area_unit())?;
            eprintln!("Wrote {rows} listings to {}", path.display());
            rows
        }
        None => write_grid(io::stdout().lock(), listings, filters.area_unit())?,
    };
    tracing::debug!(rows, "listing export finished");
    Ok(())
}

pub(crate) async fn run_region_grade(args: RegionGradeArgs) -> Result<(), AppError> {
    let RegionGradeArgs {
        view_mode,
        admin_code,
        base_grade,
        geojson,
        hash,
    } = args;

    let simulator = RegionGradeSimulator::new(hash);
    println!(
        "Region grades for view '{}' ({} hash)",
        view_mode.label(),
        hash.token()
    );

    if let Some(path) = geojson {
        let regions = fetch_regions(&path).await?;
        if regions.is_empty() {
            println!("No regions found in {}", path.display());
        }
        let mut counts: BTreeMap<Grade, usize> = BTreeMap::new();
        for region in &regions {
            let grade = simulator.grade_for(region, view_mode);
            *counts.entry(grade).or_default() += 1;
            println!(
                "  - {} {:<16} base {} -> {} ({})",
                region.admin_code(),
                region.name(),
                region.base_grade(),
                grade,
                grade.fill_color()
            );
        }
        print_counts(&counts);
        return Ok(());
    }

    let Some(code) = admin_code else {
        return Err(AppError::InvalidInput(
            "pass --admin-code or --geojson".to_string(),
        ));
    };
    let base_grade = Grade::from_letter(&base_grade).ok_or_else(|| {
        AppError::InvalidInput(format!("--base-grade '{base_grade}' must be A, B, C or D"))
    })?;
    let code = AdminCode::new(code);
    let grade = simulator.simulate(&code, base_grade, view_mode);
    println!("  - {code}: {grade} ({})", grade.fill_color());
    Ok(())
}

pub(crate) fn run_region_assess(args: RegionAssessArgs) -> Result<(), AppError> {
    let file = File::open(&args.indicators)?;
    let rows = read_indicators(BufReader::new(file))?;
    let mut assessments = GradeAssessor::standard().assess(&rows);
    assessments.sort_by(|a, b| b.safety_score.total_cmp(&a.safety_score));

    println!(
        "Region safety assessment ({} regions from {})",
        assessments.len(),
        args.indicators.display()
    );
    let mut counts: BTreeMap<Grade, usize> = BTreeMap::new();
    for assessment in &assessments {
        *counts.entry(assessment.safety_grade).or_default() += 1;
        println!(
            "  - {} {:<16} score {:.3} grade {}",
            assessment.admin_code, assessment.name, assessment.safety_score, assessment.safety_grade
        );
    }
    print_counts(&counts);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let seed = args.seed.unwrap_or(DEFAULT_SEED);
    let count = args.count.unwrap_or(30);
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    println!("Tenant Note pipeline demo (seed {seed}, {count} listings, as of {today})");
    let catalog = ListingCatalog::generate(count, seed, today);
    let engine = ScoringEngine::standard();

    println!("\n1. Generation and scoring");
    print_grade_distribution(catalog.listings().iter());
    if let Some(best) = catalog
        .listings()
        .iter()
        .max_by(|a, b| a.final_score().total_cmp(&b.final_score()))
    {
        println!("  Top listing: {} ({:.1})", best.name(), best.final_score());
        for component in best.score_card(&engine).components {
            println!(
                "    - {:<22} {:>3} x {:.2} = {:>5.1}",
                component.label, component.score, component.weight, component.contribution
            );
        }
        render_listing(best, AreaUnit::Pyeong, true);
    }

    println!("\n2. Filtering");
    let mut state = FilterState::default();
    let pipeline = ListingPipeline::default();
    for (label, deal_type) in [("monthly", DealType::Monthly), ("jeonse", DealType::Jeonse)] {
        state.deal_type = deal_type;
        let run = pipeline.run(&catalog, &state);
        println!(
            "  - {label}: {} listings across {} markers",
            run.filtered().len(),
            run.markers().len()
        );
    }
    state.reset();
    state.size_bucket = SizeBucket::From10To20;
    state.budget.deposit_max = "20000".to_string();
    let run = pipeline.run(&catalog, &state);
    println!(
        "  - monthly, 10-20 pyeong, deposit <= 2억: {} listings",
        run.filtered().len()
    );

    println!("\n3. Region grades for 11210640");
    let simulator = RegionGradeSimulator::default();
    let code = AdminCode::from("11210640");
    for mode in ViewMode::ordered() {
        let grade = simulator.simulate(&code, Grade::B, mode);
        println!("  - {:<22} {} ({})", mode.label(), grade, grade.fill_color());
    }

    Ok(())
}

fn render_listing(listing: &Listing, unit: AreaUnit, with_swot: bool) {
    println!(
        "  #{:<4} [{}] {:<22} {:<10} {:>14} {:>8} | {:.1} {} | listed {}",
        listing.id(),
        listing.housing_type().code(),
        listing.name(),
        listing.deal_type().label(),
        format_price(listing.price()),
        unit.format(listing.size()),
        listing.final_score(),
        listing.grade(),
        listing.listed_on()
    );

    let features: Vec<&str> = listing.features().iter().map(|tag| tag.label()).collect();
    if !features.is_empty() {
        println!("        {}", features.join(" · "));
    }

    if with_swot {
        let swot = listing.swot();
        for (label, tags) in [
            ("S", &swot.strengths),
            ("W", &swot.weaknesses),
            ("O", &swot.opportunities),
            ("T", &swot.threats),
        ] {
            let descriptions: Vec<&str> = tags.iter().map(|tag| tag.description()).collect();
            println!("        {label}: {}", descriptions.join("; "));
        }
    }
}

fn print_grade_distribution<'a>(listings: impl Iterator<Item = &'a Listing>) {
    let mut counts: BTreeMap<Grade, usize> = BTreeMap::new();
    for listing in listings {
        *counts.entry(listing.grade()).or_default() += 1;
    }
    print_counts(&counts);
}

fn print_counts(counts: &BTreeMap<Grade, usize>) {
    let summary: Vec<String> = Grade::ordered()
        .into_iter()
        .map(|grade| format!("{grade}: {}", counts.get(&grade).copied().unwrap_or(0)))
        .collect();
    println!("  Grades -> {}", summary.join(" | "));
}
