use anyhow::{Context, Result};
use console::{style, Term};
use dialoguer::{theme::ColorfulTheme, Input, Password, Select};
use report_digest::config::Settings;
use report_digest::ops::{get_metrics_string, init_tracing};
use report_digest::summarizer::SummaryModel;
use report_digest::{DigestOutcome, Pipeline, SearchInputs, SessionContext};
const MENU: [&str; 8] = [
    "Edit search inputs",
    "Fetch report list",
    "Next page",
    "Previous page",
    "Summarize a report",
    "Show debug panel",
    "Show metrics",
    "Quit",
];

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let settings = Settings::from_env().context("Failed to load settings from the environment")?;
    let has_env_key = settings.openai_api_key.is_some();
    let pipeline = build_pipeline(settings)?;
    let mut session = SessionContext::new(SearchInputs::default());

    let term = Term::stdout();
    let theme = ColorfulTheme::default();
    tracing::info!("report-digest started");

    println!("{}", style("ALIO research report digest").cyan().bold());

    loop {
        println!();
        print_status(&session);

        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&MENU)
            .default(1)
            .interact_on(&term)
            .context("Failed to read menu selection")?;

        match selection {
            0 => edit_inputs(&theme, &mut session)?,
            1 => {
                match pipeline.fetch_list(&mut session).await {
                    Ok(count) => println!("{}", style(format!("{count} report(s) found")).green()),
                    Err(e) => println!("{}", style(format!("Lookup failed: {e}")).red()),
                }
                print_candidates(&session);
            }
            2 | 3 => {
                let page = if selection == 2 {
                    session.page + 1
                } else {
                    session.page.saturating_sub(1).max(1)
                };
                match pipeline.fetch_page(&mut session, page).await {
                    Ok(count) => println!("{}", style(format!("Page {page}: {count} report(s)")).green()),
                    Err(e) => println!("{}", style(format!("Page fetch failed: {e}")).red()),
                }
                print_candidates(&session);
            }
            4 => summarize(&theme, &pipeline, &mut session, has_env_key).await?,
            5 => print_debug(&session),
            6 => println!("{}", get_metrics_string()),
            7 => {
                println!("{}", style("Goodbye").blue());
                break;
            }
            _ => unreachable!(),
        }
    }

    Ok(())
}

fn build_pipeline(settings: Settings) -> Result<Pipeline> {
    Pipeline::from_settings(settings).context("Failed to build the report pipeline")
}

fn print_status(session: &SessionContext) {
    let inputs = &session.inputs;
    let pages = session
        .total_pages()
        .map(|p| p.to_string())
        .unwrap_or_else(|| "?".to_string());
    println!(
        "{} org={} type={} page-size={} model={} | page {}/{} | {} report(s) loaded",
        style("▶").dim(),
        inputs.org_code,
        inputs.report_type,
        inputs.page_size,
        inputs.model,
        session.page,
        pages,
        session.candidates.len(),
    );
}

fn edit_inputs(theme: &ColorfulTheme, session: &mut SessionContext) -> Result<()> {
    let inputs = &mut session.inputs;

    inputs.org_code = Input::with_theme(theme)
        .with_prompt("Organization code (apbaId)")
        .with_initial_text(inputs.org_code.clone())
        .interact_text()?;
    inputs.report_type = Input::with_theme(theme)
        .with_prompt("Report type code (reportFormRootNo)")
        .with_initial_text(inputs.report_type.clone())
        .interact_text()?;
    inputs.page_size = Input::with_theme(theme)
        .with_prompt("Page size")
        .default(inputs.page_size)
        .validate_with(|size: &u32| if (1..=500).contains(size) { Ok(()) } else { Err("1 to 500") })
        .interact_text()?;

    let models: Vec<&str> = SummaryModel::ALL.iter().map(|m| m.as_str()).collect();
    let current = SummaryModel::ALL
        .iter()
        .position(|m| *m == inputs.model)
        .unwrap_or(0);
    let choice = Select::with_theme(theme)
        .with_prompt("Model")
        .items(&models)
        .default(current)
        .interact()?;
    inputs.model = SummaryModel::ALL[choice];

    Ok(())
}

fn print_candidates(session: &SessionContext) {
    for (i, candidate) in session.candidates.iter().enumerate() {
        println!(
            "{:>3}. {} {} {}",
            i + 1,
            candidate.title,
            style(&candidate.org).dim(),
            style(&candidate.date).dim()
        );
    }
}

async fn summarize(
    theme: &ColorfulTheme,
    pipeline: &Pipeline,
    session: &mut SessionContext,
    has_env_key: bool,
) -> Result<()> {
    if session.candidates.is_empty() {
        println!("{}", style("Fetch the report list first").yellow());
        return Ok(());
    }

    let labels: Vec<String> = session
        .candidates
        .iter()
        .map(|c| format!("{} | {} | {}", c.title, c.org, c.date))
        .collect();
    let index = Select::with_theme(theme)
        .with_prompt("Report")
        .items(&labels)
        .default(0)
        .interact()?;

    if !has_env_key && session.api_key().is_none() {
        let key = Password::with_theme(theme)
            .with_prompt("OpenAI API key")
            .allow_empty_password(true)
            .interact()?;
        session.set_api_key(key);
    }

    println!("{}", style("Resolving PDF and summarizing…").dim());
    match pipeline.digest_selected(session, index).await {
        Ok(DigestOutcome::Summary {
            summary, pdf_url, ..
        }) => {
            println!("{}", style(format!("Source: {pdf_url}")).dim());
            println!();
            println!("{summary}");
        }
        Ok(outcome) => println!("{}", style(outcome.status_line()).yellow()),
        Err(e) => println!("{}", style(format!("Processing failed: {e}")).red()),
    }
    Ok(())
}

fn print_debug(session: &SessionContext) {
    let debug = &session.debug;
    let show = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    println!("{}", style("Debug panel").bold());
    println!("  probe       : {}", show(&debug.probe));
    println!("  total       : {}", session.total.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string()));
    println!("  pdf url     : {}", show(&debug.pdf_url));
    println!("  text chars  : {}", debug.text_chars);
    println!("  outcome     : {}", show(&debug.outcome));
    println!("  last error  : {}", show(&debug.last_error));
    if let Some(preview) = &debug.text_preview {
        println!("  text preview:");
        println!("{}", style(preview).dim());
    }
    if let Some(first) = session.candidates.first() {
        let raw = serde_json::to_string_pretty(&first.raw).unwrap_or_default();
        println!("  first raw entry:");
        println!("{}", style(raw).dim());
    }
}
