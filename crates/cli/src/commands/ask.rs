//! `coursemate ask`: Interactive or single-question mode.

use std::path::PathBuf;
use std::sync::Arc;
use coursemate_agent::{CourseAssistant, QueryResponse};
use coursemate_config::AppConfig;
use coursemate_providers::AnthropicProvider;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(
    message: Option<String>,
    catalog: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Fail early with setup instructions when no key is configured
    let Some(api_key) = config.api_key.as_deref() else {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    ANTHROPIC_API_KEY=sk-ant-...");
        eprintln!("    COURSEMATE_API_KEY=sk-ant-...   (takes priority)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    };

    let mut provider = AnthropicProvider::new(api_key)?;
    if let Some(ref url) = config.api_url {
        provider = provider.with_base_url(url);
    }

    let index = Arc::new(super::load_index(&config, catalog)?);
    let assistant = CourseAssistant::from_config(&config, Arc::new(provider), index);

    if let Some(msg) = message {
        // Single question mode
        eprint!("  Thinking...");
        let response = assistant.query(&msg, None).await;
        eprint!("\r              \r");
        match response {
            Ok(response) => println!("{}", render(&response)),
            Err(e) => return Err(format!("Query failed: {e}").into()),
        }
        return Ok(());
    }

    let analytics = assistant.course_analytics().await;
    println!();
    println!("  CourseMate — Interactive Mode");
    println!();
    println!("  Model:     {}", config.model);
    println!("  Courses:   {}", analytics.total_courses);
    println!();
    println!("  Type your question and press Enter.");
    println!("  Type '/clear' to forget the conversation, 'exit' or Ctrl+C to quit.");
    println!();

    let session_id = assistant.sessions().create_session().await;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    prompt()?;
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        match input {
            "" => {}
            "exit" | "quit" => break,
            "/clear" => {
                assistant.sessions().clear(&session_id).await;
                println!("  (conversation cleared)\n");
            }
            question => {
                eprint!("  ...");
                let outcome = assistant.query(question, Some(&session_id)).await;
                eprint!("\r     \r");
                match outcome {
                    Ok(response) => {
                        println!();
                        for line in render(&response).lines() {
                            println!("  Assistant > {line}");
                        }
                        println!();
                    }
                    Err(e) => {
                        eprintln!("  Query failed: {e}");
                        println!();
                    }
                }
            }
        }
        prompt()?;
    }

    Ok(())
}

fn prompt() -> std::io::Result<()> {
    use std::io::Write;
    print!("  You > ");
    std::io::stdout().flush()
}

/// The answer followed by its numbered sources.
fn render(response: &QueryResponse) -> String {
    let mut out = response.answer.clone();
    if !response.sources.is_empty() {
        out.push_str("\n\nSources:");
        for (i, source) in response.sources.iter().enumerate() {
            match source.url {
                Some(ref url) => out.push_str(&format!("\n  [{}] {} <{url}>", i + 1, source.text)),
                None => out.push_str(&format!("\n  [{}] {}", i + 1, source.text)),
            }
        }
    }
    out
}
