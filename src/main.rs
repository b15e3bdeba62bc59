use colored::Colorize;
use storage_account_demo::run_from_env;

#[tokio::main]
async fn main() {
    // Do as little as possible in main.rs as it can't contain any tests
    if let Err(e) = log4rs::init_file("log4rs.yml", Default::default()) {
        eprintln!("Error initializing log4rs: {e}");
    }
    dotenv::dotenv().ok();
    //
    log::info!("#Start main()");

    let code = match run_from_env().await {
        Ok(outcome) => {
            log::info!("#End main() {outcome:?}");
            outcome.exit_code()
        }
        Err(e) => {
            log::error!("{e}");
            println!("{}", e.to_string().red());
            1
        }
    };
    std::process::exit(code);
}
