use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let themes = ["light", "dark", "sepia"];

    let read = clap::Command::new("read")
        .about("Open a page in the reader")
        .arg(clap::arg!(<INPUT> "URL to fetch, local HTML file, or '-' for stdin"))
        .arg(clap::arg!(--url <URL> "Page URL for file or stdin input"))
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (view, html, text, json)")
                .default_value("view")
                .value_parser(["view", "html", "text", "json"]),
        )
        .arg(clap::arg!(--theme <THEME> "Theme for this run only").value_parser(themes))
        .arg(clap::arg!(--summarize "Request an AI summary of the article"))
        .arg(clap::arg!(--endpoint <URL> "Summary service endpoint"))
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
        .arg(clap::arg!(--user_agent <UA> "Custom User-Agent for HTTP requests").value_name("UA"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--prefers_dark "Behave as if the system prefers a dark color scheme"));

    let theme = clap::Command::new("theme")
        .about("Show or change the saved reader theme")
        .subcommand_required(true)
        .subcommand(clap::Command::new("show").about("Print the saved theme"))
        .subcommand(
            clap::Command::new("set")
                .about("Save a theme")
                .arg(clap::arg!(<THEME> "Theme to save").value_parser(themes)),
        )
        .subcommand(clap::Command::new("clear").about("Forget the saved theme"));

    let mut cmd = clap::Command::new("hush")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Hush Contributors")
        .about("Distraction-free reader view for web pages")
        .subcommand_required(true)
        .arg(
            clap::arg!(--state_file <FILE> "State file holding the theme and \"what's new\" flags")
                .global(true)
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(-v --verbose "Enable debug logging").global(true))
        .subcommand(read)
        .subcommand(theme);

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "hush", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "hush", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "hush", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "hush", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
