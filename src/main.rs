use anyhow::Result;
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use ezssg::assets::{AssetProvider, BundledAssets, DirectoryAssets};
use ezssg::build::build_site;
use ezssg::config::{Project, TagPolicy};
use ezssg::scaffold;
use ezssg::serve::{serve, DEFAULT_PORT};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(&app().get_matches()) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn app<'a, 'b>() -> App<'a, 'b> {
    App::new("ezssg")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Builds a personal blog from markdown")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("root")
                .long("root")
                .takes_value(true)
                .default_value(".")
                .global(true)
                .help("The project directory"),
        )
        .subcommand(SubCommand::with_name("init").about("Creates the project layout and sample files"))
        .subcommand(
            SubCommand::with_name("generate")
                .about("Builds the site into `docs/`")
                .arg(
                    Arg::with_name("theme")
                        .long("theme")
                        .takes_value(true)
                        .help("A theme directory to use instead of the bundled theme"),
                )
                .arg(
                    Arg::with_name("strict-tags")
                        .long("strict-tags")
                        .help("Fail when a post lists a tag that has no descriptor"),
                ),
        )
        .subcommand(
            SubCommand::with_name("post")
                .about("Creates a post")
                .arg(Arg::with_name("title").required(true).help("The post title"))
                .arg(
                    Arg::with_name("tags")
                        .short("t")
                        .long("tags")
                        .takes_value(true)
                        .multiple(true)
                        .help("Tag slugs for the post"),
                ),
        )
        .subcommand(
            SubCommand::with_name("tag")
                .about("Creates tag descriptors")
                .arg(Arg::with_name("tags").required(true).multiple(true)),
        )
        .subcommand(
            SubCommand::with_name("serve")
                .about("Serves the built site")
                .arg(
                    Arg::with_name("port")
                        .long("port")
                        .short("p")
                        .takes_value(true)
                        .help("The port to listen on (default 3000)"),
                ),
        )
}

fn run(matches: &ArgMatches) -> Result<()> {
    let project = |m: &ArgMatches| Project::new(root(matches, m));

    match matches.subcommand() {
        ("init", Some(m)) => scaffold::init(&project(m))?,
        ("generate", Some(m)) => {
            let mut project = project(m);
            if m.is_present("strict-tags") {
                project = project.with_tag_policy(TagPolicy::Strict);
            }
            let assets: Box<dyn AssetProvider> = match m.value_of("theme") {
                Some(theme) => Box::new(DirectoryAssets::new(theme)),
                None => Box::new(BundledAssets),
            };
            build_site(&project, assets.as_ref())?;
        }
        ("post", Some(m)) => {
            let title = m.value_of("title").unwrap_or_default();
            let tags: Vec<String> = m
                .values_of("tags")
                .map(|values| values.map(str::to_owned).collect())
                .unwrap_or_default();
            scaffold::create_post(&project(m), title, &tags)?;
        }
        ("tag", Some(m)) => {
            let tags: Vec<&str> = m.values_of("tags").map(Iterator::collect).unwrap_or_default();
            scaffold::create_tags(&project(m), tags.as_slice())?;
        }
        ("serve", Some(m)) => {
            let port = match m.value_of("port") {
                Some(port) => port.parse()?,
                None => DEFAULT_PORT,
            };
            serve(&project(m).output_directory(), port)?;
        }
        (name, _) => anyhow::bail!("unknown command `{}`", name),
    }
    Ok(())
}

// `--root` is global, so it may come before or after the subcommand.
fn root<'a>(matches: &'a ArgMatches<'a>, sub: &'a ArgMatches<'a>) -> &'a str {
    let m = match sub.occurrences_of("root") {
        0 => matches,
        _ => sub,
    };
    m.value_of("root").unwrap_or(".")
}
