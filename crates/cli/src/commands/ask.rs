//! `shopscope ask` — query the agent from the terminal.

use shopscope_config::AppConfig;
use std::io::{BufRead, Write};

pub async fn run(config: AppConfig, message: Option<String>) -> anyhow::Result<()> {
    let agent = super::build_agent(&config).await?;

    if let Some(query) = message {
        let outcome = agent.run(&query).await;
        println!("{}", outcome.response);
        println!("\nTools used: {}", outcome.tools_used);
        return Ok(());
    }

    println!("ShopScope analytics agent. Type 'exit' to quit.");
    let stdin = std::io::stdin();
    loop {
        print!("\nYour query: ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("exit") {
            println!("Goodbye!");
            break;
        }

        let outcome = agent.run(query).await;
        println!("\nAgent Response: {}", outcome.response);
        println!("Tools Used: {}", outcome.tools_used);
    }

    Ok(())
}
