use cheongyak::api::HttpUnitSource;
use cheongyak::config::{ApiConfig, AppConfig};
use cheongyak::error::AppError;
use cheongyak::listings::{decode, encode, FilterSelection};
use cheongyak::money::format_manwon;
use cheongyak::rent::ContractBand;
use clap::Args;

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Lowest deposit of the band (만원)
    #[arg(long)]
    pub(crate) deposit_min: f64,
    /// Highest deposit of the band (만원)
    #[arg(long)]
    pub(crate) deposit_max: f64,
    /// Monthly rent at the highest deposit (만원)
    #[arg(long)]
    pub(crate) rent_min: f64,
    /// Monthly rent at the lowest deposit (만원)
    #[arg(long)]
    pub(crate) rent_max: f64,
    /// Deposit to quote (만원). Defaults to the lowest deposit.
    #[arg(long)]
    pub(crate) deposit: Option<f64>,
}

#[derive(Args, Debug)]
pub(crate) struct QueryArgs {
    /// Listing query string, with or without the leading `?`
    pub(crate) query: String,
    /// Results per page requested from the units API (defaults to APP_PAGE_SIZE)
    #[arg(long)]
    pub(crate) page_size: Option<u32>,
    /// Override the units API base URL
    #[arg(long)]
    pub(crate) api_base: Option<String>,
}

pub(crate) fn run_quote(args: QuoteArgs) {
    for line in describe_quote(&args) {
        println!("{line}");
    }
}

pub(crate) fn run_query(args: QueryArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let api = match args.api_base.as_deref() {
        Some(base) => config.api.with_base(base)?,
        None => config.api,
    };
    let page_size = args.page_size.unwrap_or(api.page_size).max(1);

    let selection = decode(&args.query);
    for line in describe_query(&selection, &api, page_size)? {
        println!("{line}");
    }

    match serde_json::to_string_pretty(&selection) {
        Ok(json) => println!("Decoded filters:\n{json}"),
        Err(err) => println!("Decoded filters unavailable: {err}"),
    }

    Ok(())
}

fn describe_quote(args: &QuoteArgs) -> Vec<String> {
    let band = ContractBand {
        group: String::new(),
        deposit_min: args.deposit_min,
        deposit_max: args.deposit_max,
        monthly_rent_min: args.rent_min,
        monthly_rent_max: args.rent_max,
        down_payment: 0.0,
    };

    if !band.offers_conversion() {
        let quote = band.quote(band.deposit_min);
        return vec![
            "Fixed contract: no deposit conversion".to_string(),
            format!(
                "- deposit {} | monthly rent {}",
                format_manwon(quote.deposit()),
                format_manwon(quote.rent())
            ),
        ];
    }

    let slider = band.slider();
    let deposit = args
        .deposit
        .unwrap_or_else(|| slider.deposit_at(slider.initial()));
    let quote = band.quote(deposit);

    vec![
        format!(
            "Deposit range {} ~ {} (slider {}..={})",
            format_manwon(args.deposit_min.min(args.deposit_max)),
            format_manwon(args.deposit_min.max(args.deposit_max)),
            slider.min,
            slider.max
        ),
        format!(
            "- deposit {} | monthly rent {} ({:.2}만원)",
            format_manwon(quote.deposit()),
            format_manwon(quote.rent()),
            quote.rent()
        ),
    ]
}

fn describe_query(
    selection: &FilterSelection,
    api: &ApiConfig,
    page_size: u32,
) -> Result<Vec<String>, AppError> {
    let upstream = HttpUnitSource::new(api)?.units_url(selection, page_size)?;

    Ok(vec![
        format!("Canonical page: /listings?{}", encode(selection)),
        format!("Units API: {upstream}"),
    ])
}
