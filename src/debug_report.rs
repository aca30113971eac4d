use osmtype::{Classificator, ClassifyResultVerbose, OsmElement, Rounds};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(input: &OsmElement, taxonomy: &Classificator, res: &ClassifyResultVerbose, color: bool) {
    let palette = ansi::Palette::new(color);
    let tags = input.tags.iter().map(|t| format!("{}={}", t.key, t.value)).collect::<Vec<_>>().join(" ");
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Classifying #{}: {}", input.id, tags), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Walk ━━━", ansi::GRAY));
    print_paths(res, &palette);

    println!("\n{}", palette.paint("━━━ Types ━━━", ansi::GRAY));
    print_types(taxonomy, res, &palette);

    println!("\n{}", palette.paint("━━━ Attributes ━━━", ansi::GRAY));
    print_attributes(res, &palette);

    let t = &res.details.timings;
    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Names: {}  │  Walk: {}  │  Post-match: {}  │  Preprocess: {}",
        palette.paint(format!("{:?}", t.total), ansi::GREEN),
        palette.dim(format!("{:?}", t.names)),
        palette.paint(format!("{:?}", t.walk), ansi::CYAN),
        palette.dim(format!("{:?}", t.post_match)),
        palette.dim(format!("{:?}", t.preprocess)),
    );
    println!();
}

fn print_paths(res: &ClassifyResultVerbose, palette: &ansi::Palette) {
    if res.details.paths.is_empty() {
        println!("{}", palette.dim("  No path matched the taxonomy"));
        return;
    }

    for (idx, path) in res.details.paths.iter().enumerate() {
        println!(
            "  {} {} {} {}",
            palette.paint(format!("[{}]", idx), ansi::GRAY),
            palette.paint(path.labels.join(" › "), ansi::BLUE),
            palette.dim(format!("{:?}", path.code)),
            if path.visible { palette.paint("✓ visible", ansi::GREEN) } else { palette.dim("✗ hidden") }
        );
    }
}

fn print_types(taxonomy: &Classificator, res: &ClassifyResultVerbose, palette: &ansi::Palette) {
    let params = &res.params;
    if params.types().is_empty() {
        println!("{}", palette.dim("  No types assigned"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • No tag key is a top-level taxonomy category");
        println!("  • Every matched path is hidden (try --all-paths)");
        println!("  • The classifying tags were excluded (proposed, construction, =no)");
        return;
    }

    for &code in params.types() {
        println!(
            "  {} {}",
            palette.bold(palette.paint(taxonomy.readable(code), ansi::GREEN)),
            palette.dim(code.to_string())
        );
    }

    let rounds = res.details.rounds;
    if !rounds.is_empty() {
        let names: Vec<&str> = [
            (Rounds::HIGHWAY, "highway"),
            (Rounds::SUBWAY, "subway"),
            (Rounds::RAILWAY_STATION, "railway station"),
        ]
        .into_iter()
        .filter(|(round, _)| rounds.contains(*round))
        .map(|(_, name)| name)
        .collect();
        println!("  {} {}", palette.dim("qualifier rounds:"), palette.paint(names.join(", "), ansi::CYAN));
    }
    if res.details.address_fixup {
        println!("  {}", palette.paint("entrance replaced by address", ansi::YELLOW));
    }
}

fn print_attributes(res: &ClassifyResultVerbose, palette: &ansi::Palette) {
    let params = &res.params;
    let field = |label: &str, value: String| {
        println!("  {} {}", palette.paint(format!("{label:<14}"), ansi::BLUE), value);
    };

    for (lang, name) in params.names() {
        field(&format!("name:{lang}"), palette.bold(name));
    }
    if let Some(number) = params.house_number() {
        field("house number", number.to_string());
    }
    if let Some(name) = params.house_name() {
        field("house name", name.to_string());
    }
    if let Some(street) = &params.street {
        field("street", street.clone());
    }
    if let Some(flats) = &params.flats {
        field("flats", flats.clone());
    }
    if let Some(reference) = &params.reference {
        field("ref", reference.clone());
    }
    if let Some(city) = &params.subway_city {
        field("subway city", city.clone());
    }
    field("rank", params.rank.to_string());
    field("layer", params.layer.to_string());
    field("reversed", if params.reverse_geometry { palette.paint("yes", ansi::YELLOW) } else { palette.dim("no") });
}
