use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use listiq::ai::{OpenAiModel, TextModel};
use listiq::app::{Comparison, PropertyRow, SaveOutcome};
use listiq::config::Config;
use listiq::models::{MortgageSettings, PropertyDraft};
use listiq::mortgage::compute_monthly_payment;
use listiq::picks::{self, ConsensusPick, ConsensusPicks, PickResult, RecordStats};
use listiq::share::{self, ImportKind};
use listiq::sort::{MissingValues, SortOrder, View};
use listiq::store::FileStore;
use listiq::summary::{self, Article, CategoryPrompt};
use listiq::Error;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Compare real-estate listings from the command line
#[derive(Parser, Debug)]
#[command(name = "listiq")]
#[command(version)]
struct Cli {
    /// Directory holding the saved state (overrides LISTIQ_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a listing to the comparison
    Add(AddArgs),
    /// Change fields of an existing listing
    Edit(EditArgs),
    /// Remove one or more listings
    Remove {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Short list of every listing
    List,
    /// Toggle a listing's favorite flag
    Favorite { id: String },
    /// Set the sort order, or list the available orders
    Sort { order: Option<SortOrder> },
    /// Sorted comparison with highlights and payments
    View(ViewArgs),
    /// Show or change mortgage settings
    Mortgage(MortgageArgs),
    /// One-off monthly payment calculation
    Payment(PaymentArgs),
    /// Saved searches
    #[command(subcommand)]
    Search(SearchCommand),
    /// Summarize news articles from a JSON file
    Summarize(SummarizeArgs),
    /// Consensus betting picks
    #[command(subcommand)]
    Picks(PicksCommand),
}

#[derive(Args, Debug)]
struct AddArgs {
    url: String,
    #[arg(long)]
    price: f64,
    #[arg(long)]
    sqft: u32,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    source: Option<String>,
    #[arg(long, default_value_t = 0.0)]
    taxes: f64,
    #[arg(long, default_value_t = 0)]
    beds: u32,
    #[arg(long, default_value_t = 0.0)]
    baths: f32,
    #[arg(long)]
    year: Option<u16>,
}

#[derive(Args, Debug)]
struct EditArgs {
    id: String,
    #[arg(long)]
    url: Option<String>,
    #[arg(long)]
    price: Option<f64>,
    #[arg(long)]
    sqft: Option<u32>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    source: Option<String>,
    #[arg(long)]
    taxes: Option<f64>,
    #[arg(long)]
    beds: Option<u32>,
    #[arg(long)]
    baths: Option<f32>,
    #[arg(long)]
    year: Option<u16>,
}

#[derive(Args, Debug)]
struct ViewArgs {
    /// `all` or `favorites`
    #[arg(default_value = "all")]
    view: View,
    /// Change the saved sort order first, e.g. `pricePerSqFt-asc`
    #[arg(long)]
    sort: Option<SortOrder>,
    /// Put listings without a value for the sort field last
    #[arg(long)]
    missing_last: bool,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct MortgageArgs {
    #[arg(long, conflicts_with = "disable")]
    enable: bool,
    #[arg(long)]
    disable: bool,
    /// Annual interest rate in percent
    #[arg(long)]
    rate: Option<f64>,
    /// Down payment in percent
    #[arg(long)]
    down: Option<f64>,
    /// Loan term in years
    #[arg(long)]
    term: Option<u32>,
}

#[derive(Args, Debug)]
struct PaymentArgs {
    #[arg(long)]
    price: f64,
    #[arg(long, default_value_t = 20.0)]
    down: f64,
    #[arg(long, default_value_t = 6.5)]
    rate: f64,
    /// Annual property taxes
    #[arg(long, default_value_t = 0.0)]
    taxes: f64,
    #[arg(long, default_value_t = 30)]
    term: u32,
}

#[derive(Subcommand, Debug)]
enum SearchCommand {
    /// Save the current list under a name
    Save {
        name: String,
        /// Replace a saved search with the same name
        #[arg(long)]
        overwrite: bool,
    },
    /// Replace the current list with a saved search
    Load { search: String },
    Delete { search: String },
    List,
    /// Print a share code, a share link or write a JSON file
    Export {
        search: String,
        /// Print a link on this origin instead of the bare code
        #[arg(long)]
        origin: Option<String>,
        /// Write the JSON export into this directory
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Import a share code, link, or exported JSON file
    Import {
        input: String,
        /// Treat the input as an opened share link and load it
        #[arg(long)]
        link: bool,
    },
}

#[derive(Args, Debug)]
struct SummarizeArgs {
    /// JSON array of articles
    articles: PathBuf,
    /// JSON array of category prompts
    #[arg(long)]
    prompts: Option<PathBuf>,
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum PicksCommand {
    /// Research consensus picks for a date (defaults to today)
    Research {
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Authorization header; required when CRON_SECRET is set
        #[arg(long, env = "LISTIQ_CRON_AUTHORIZATION")]
        authorization: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Win/loss record for a JSON array of graded picks
    Stats { picks: PathBuf },
    /// Grade one pick in a JSON array file
    Grade {
        picks: PathBuf,
        id: String,
        /// win, loss or push
        result: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env().context("Failed to read configuration")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    match cli.command {
        Command::Summarize(args) => summarize(&config, args).await,
        Command::Picks(command) => run_picks(&config, command).await,
        Command::Payment(args) => {
            let b =
                compute_monthly_payment(args.price, args.down, args.rate, args.taxes, args.term);
            print_breakdown(&b);
            Ok(())
        }
        command => {
            let store = FileStore::new(&config.data_dir);
            debug!(data_dir = %store.dir().display(), "Using data directory");
            let mut app = Comparison::open(store).await;
            run_comparison(&mut app, command).await
        }
    }
}

async fn run_comparison(app: &mut Comparison<FileStore>, command: Command) -> Result<()> {
    match command {
        Command::Add(args) => {
            let draft = PropertyDraft {
                url: args.url,
                address: args.address.unwrap_or_default(),
                source: args.source.unwrap_or_default(),
                price: args.price,
                square_feet: args.sqft,
                taxes: args.taxes,
                bedrooms: args.beds,
                bathrooms: args.baths,
                year_built: args.year,
            };
            let property = app.add_property(draft).await?;
            println!("Added {} ({})", property.address, property.id);
        }
        Command::Edit(args) => {
            let current = app
                .property(&args.id)
                .with_context(|| format!("No property with id {}", args.id))?;
            let mut draft = PropertyDraft::from(current);
            if let Some(url) = args.url {
                draft.url = url;
            }
            if let Some(price) = args.price {
                draft.price = price;
            }
            if let Some(sqft) = args.sqft {
                draft.square_feet = sqft;
            }
            if let Some(address) = args.address {
                draft.address = address;
            }
            if let Some(source) = args.source {
                draft.source = source;
            }
            if let Some(taxes) = args.taxes {
                draft.taxes = taxes;
            }
            if let Some(beds) = args.beds {
                draft.bedrooms = beds;
            }
            if let Some(baths) = args.baths {
                draft.bathrooms = baths;
            }
            if args.year.is_some() {
                draft.year_built = args.year;
            }
            let property = app.update_property(&args.id, draft).await?;
            println!("Updated {}", property.address);
        }
        Command::Remove { ids } => {
            if let [id] = ids.as_slice() {
                app.remove_property(id).await?;
                println!("Removed {id}");
            } else {
                let removed = app.remove_selected(&ids).await?;
                println!("Removed {removed} properties");
            }
        }
        Command::List => {
            let state = app.state();
            if state.properties.is_empty() {
                println!("No properties yet. Add one with `listiq add <url> --price .. --sqft ..`");
            }
            for property in &state.properties {
                let star = if state.favorites.contains(&property.id) { "*" } else { " " };
                println!(
                    "{star} {}  {}  {}  [{}]",
                    property.id,
                    property.address,
                    money(property.price),
                    property.source
                );
            }
        }
        Command::Favorite { id } => {
            let now = app.toggle_favorite(&id).await?;
            println!("{id} {}", if now { "added to favorites" } else { "removed from favorites" });
        }
        Command::Sort { order: Some(order) } => {
            app.set_sort(order).await?;
            println!("Sorting by {}", order.label());
        }
        Command::Sort { order: None } => {
            let current = app.state().sort;
            for option in SortOrder::options() {
                let marker = if option == current { "*" } else { " " };
                println!("{marker} {:<22} {}", option.to_string(), option.label());
            }
        }
        Command::View(args) => {
            app.set_view(args.view);
            if args.missing_last {
                app.set_missing_values(MissingValues::Last);
            }
            if let Some(order) = args.sort {
                app.set_sort(order).await?;
            }
            print_rows(app, args.json)?;
        }
        Command::Mortgage(args) => {
            let mut settings: MortgageSettings = app.state().mortgage;
            let changed = args.enable
                || args.disable
                || args.rate.is_some()
                || args.down.is_some()
                || args.term.is_some();
            if args.enable {
                settings.enabled = true;
            }
            if args.disable {
                settings.enabled = false;
            }
            if let Some(rate) = args.rate {
                settings.interest_rate = rate;
            }
            if let Some(down) = args.down {
                settings.down_payment_percentage = down;
            }
            if let Some(term) = args.term {
                settings.loan_term_years = term;
            }
            if changed {
                app.set_mortgage_settings(settings).await?;
            }
            let s = app.state().mortgage;
            println!(
                "Mortgage calculations {}: {}% interest, {}% down, {} years",
                if s.enabled { "enabled" } else { "disabled" },
                s.interest_rate,
                s.down_payment_percentage,
                s.loan_term_years
            );
        }
        Command::Search(command) => run_search(app, command).await?,
        other => bail!("{other:?} does not use the comparison store"),
    }
    Ok(())
}

async fn run_search(app: &mut Comparison<FileStore>, command: SearchCommand) -> Result<()> {
    match command {
        SearchCommand::Save { name, overwrite } => match app.save_search(&name, overwrite).await {
            Ok(SaveOutcome::Created(_)) => println!("Saved \"{}\"", name.trim()),
            Ok(SaveOutcome::Replaced(_)) => println!("Replaced \"{}\"", name.trim()),
            Err(e @ Error::SearchNameTaken(_)) => {
                bail!("{e}. Pass --overwrite to replace it.")
            }
            Err(e) => return Err(e.into()),
        },
        SearchCommand::Load { search } => {
            let count = app.load_search(&search).await?;
            println!("Loaded {count} properties from \"{search}\"");
        }
        SearchCommand::Delete { search } => {
            let removed = app.delete_search(&search).await?;
            println!("Deleted \"{}\"", removed.name);
        }
        SearchCommand::List => {
            for search in &app.state().saved_searches {
                println!(
                    "{}  {}  {} properties  saved {}",
                    search.id,
                    search.name,
                    search.properties.len(),
                    search.saved_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        SearchCommand::Export { search, origin, file } => {
            if let Some(dir) = file {
                let saved = app
                    .find_search(&search)
                    .with_context(|| format!("No saved search named {search}"))?;
                let path = dir.join(share::export_file_name(&saved.name));
                tokio::fs::create_dir_all(&dir).await?;
                tokio::fs::write(&path, app.export_search_json(&search)?)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("💾 Saved export to {}", path.display());
            } else if let Some(origin) = origin {
                let saved = app
                    .find_search(&search)
                    .with_context(|| format!("No saved search named {search}"))?;
                println!("{}", share::share_url(&origin, saved)?);
            } else {
                println!("{}", app.export_search(&search)?);
            }
        }
        SearchCommand::Import { input, link } => {
            let path = PathBuf::from(&input);
            let raw = if path.is_file() {
                tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?
            } else {
                input
            };
            let kind = if link { ImportKind::SharedLink } else { ImportKind::Code };
            let imported = app.import_search(&raw, kind).await?;
            println!(
                "Imported \"{}\" with {} properties",
                imported.name,
                imported.properties.len()
            );
        }
    }
    Ok(())
}

fn print_rows(app: &Comparison<FileStore>, json: bool) -> Result<()> {
    let rows = app.rows();

    if json {
        let values: Vec<serde_json::Value> = rows.iter().map(row_json).collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("Nothing to show.");
        return Ok(());
    }

    println!("Sorted by {}", app.state().sort.label());
    println!();
    for (i, row) in rows.iter().enumerate() {
        let p = row.property;
        let mut badges = Vec::new();
        if row.is_favorite {
            badges.push("★ favorite");
        }
        if row.is_best_value {
            badges.push("best value");
        }
        if row.is_lowest_payment {
            badges.push("lowest payment");
        }

        println!("{}. {} ({})", i + 1, p.address, money(p.price));
        if !badges.is_empty() {
            println!("   {}", badges.join(" · "));
        }
        println!(
            "   {} sq.ft, {} bd, {} ba, built {}",
            p.square_feet,
            p.bedrooms,
            p.bathrooms,
            p.year_built.map_or_else(|| "unknown".to_string(), |y| y.to_string())
        );
        if let Some(ppsf) = row.price_per_sqft {
            println!("   {}/sq.ft", money(ppsf));
        }
        if let Some(payment) = &row.payment {
            println!("   {}/month", money(payment.total_monthly));
        }
        println!("   {} · {}", p.source, p.url);
        println!("   ID: {}", p.id);
        println!();
    }
    Ok(())
}

fn row_json(row: &PropertyRow<'_>) -> serde_json::Value {
    serde_json::json!({
        "property": row.property,
        "pricePerSqFt": row.price_per_sqft,
        "payment": row.payment,
        "isBestValue": row.is_best_value,
        "isLowestPayment": row.is_lowest_payment,
        "isFavorite": row.is_favorite,
    })
}

fn print_breakdown(b: &listiq::mortgage::PaymentBreakdown) {
    println!("Down payment:      {}", money(b.down_payment));
    println!("Loan principal:    {}", money(b.principal));
    println!("Mortgage:          {}/month", money(b.monthly_mortgage));
    println!("Property taxes:    {}/month", money(b.monthly_taxes));
    println!("Insurance:         {}/month", money(b.monthly_insurance));
    println!("Total:             {}/month", money(b.total_monthly));
}

fn ai_model(config: &Config) -> Result<Option<Box<dyn TextModel>>> {
    Ok(OpenAiModel::from_config(config)
        .context("Failed to create AI client")?
        .map(|m| Box::new(m) as Box<dyn TextModel>))
}

async fn summarize(config: &Config, args: SummarizeArgs) -> Result<()> {
    let articles: Vec<Article> = read_json(&args.articles).await?;
    let prompts: Vec<CategoryPrompt> = match &args.prompts {
        Some(path) => read_json(path).await?,
        None => Vec::new(),
    };

    let model = ai_model(config)?;
    let result = summary::generate_summary(model.as_deref(), &articles, &prompts).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.text);
        info!(used_ai = result.used_ai, category = %result.category, "Summary generated");
    }
    Ok(())
}

async fn run_picks(config: &Config, command: PicksCommand) -> Result<()> {
    match command {
        PicksCommand::Research { date, authorization, json } => {
            if config.cron_secret.is_some()
                && !picks::authorize_cron(authorization.as_deref(), config.cron_secret.as_deref())
            {
                bail!("Unauthorized");
            }

            let date = date.unwrap_or_else(|| Utc::now().date_naive());
            let model = ai_model(config)?;
            let outcome = picks::research_picks(model.as_deref(), date).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_picks(&outcome.picks);
                if !outcome.used_ai {
                    println!("(fallback picks: AI research unavailable)");
                }
            }
        }
        PicksCommand::Stats { picks } => {
            let graded: Vec<ConsensusPick> = read_json(&picks).await?;
            let stats = RecordStats::from_picks(&graded);
            println!(
                "Overall: {}-{}-{} ({:.1}%)",
                stats.wins,
                stats.losses,
                stats.pushes,
                stats.win_percentage * 100.0
            );
            println!(
                "Spreads: {} ({:.1}%)",
                stats.spread_record,
                stats.spread_win_percentage * 100.0
            );
            println!(
                "Totals:  {} ({:.1}%)",
                stats.total_record,
                stats.total_win_percentage * 100.0
            );
            println!(
                "Props:   {} ({:.1}%)",
                stats.prop_record,
                stats.prop_win_percentage * 100.0
            );
        }
        PicksCommand::Grade { picks, id, result } => {
            let result = PickResult::parse_update(&result)?;
            let mut graded: Vec<ConsensusPick> = read_json(&picks).await?;
            let pick = graded
                .iter_mut()
                .find(|p| p.id == id)
                .with_context(|| format!("No pick with id {id}"))?;
            pick.result = result;
            let title = pick.title.clone();

            tokio::fs::write(&picks, serde_json::to_string_pretty(&graded)?)
                .await
                .with_context(|| format!("Failed to write {}", picks.display()))?;
            println!("{title}: {result}");
        }
    }
    Ok(())
}

fn print_picks(picks: &ConsensusPicks) {
    println!("Consensus picks for {}", picks.date);
    for (heading, group) in [
        ("Spreads", &picks.spreads),
        ("Totals", &picks.totals),
        ("Player props", &picks.player_props),
    ] {
        println!();
        println!("{heading}:");
        if group.is_empty() {
            println!("   none");
        }
        for pick in group {
            println!("   {} ({}% consensus)", pick.pick, pick.consensus_strength);
            println!("   {}", pick.matchup);
            let names: Vec<&str> = pick.sources.iter().map(|s| s.name.as_str()).collect();
            println!("   Sources: {}", names.join(", "));
        }
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

/// `1234567.8` -> `$1,234,568`
fn money(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if rounded < 0 { "-" } else { "" };
    format!("{sign}${grouped}")
}
