// Localized UI strings: English and German
// Templates use `{}` placeholders, filled left to right by `fill`

use std::fmt::Display;

use crate::tha_hint::Formula;

#[derive(Clone)]
pub struct Assets {
    pub title: &'static str,
    pub treasure_word: &'static str, // Shown on an opened treasure tile, at most 6 columns

    // Hint panel
    pub panel_title: &'static str,
    pub total_fmt: &'static str,    // "Total treasure: {}"
    pub uniform_fmt: &'static str,  // "{} has probability {}"
    pub equation_fmt: &'static str, // "{} = {}"
    pub field_fmt: &'static str,    // "A has probability: {}"

    // Status bar
    pub status_fmt: &'static str, // " Found: {} / {}   Opened: {} / {} "
    pub status_cleared: &'static str,
    pub key_new: &'static str,
    pub key_lang: &'static str,
    pub key_exit: &'static str,

    // Terminal too small
    pub tsmsg_line1: &'static str,
    pub tsmsg_line2: &'static str, // "Minimum size required: {} x {}"
    pub tsmsg_title: &'static str,

    pub lang_name: &'static str,
}

pub fn english_assets() -> Assets {
    Assets {
        title: "Treasure Hunt (computer assisted play)",
        treasure_word: "Gold",

        panel_title: "Hints",
        total_fmt: "Total treasure: {}",
        uniform_fmt: "{} has probability {}",
        equation_fmt: "{} = {}",
        field_fmt: "A has probability: {}",

        status_fmt: " Found: {} / {}   Opened: {} / {} ",
        status_cleared: "All treasures found!",
        key_new: "New",
        key_lang: "Deutsch",
        key_exit: "Exit",

        tsmsg_line1: "Terminal layout too small",
        tsmsg_line2: "Minimum size required: {} x {}",
        tsmsg_title: "Resize needed",

        lang_name: "English",
    }
}

pub fn german_assets() -> Assets {
    Assets {
        title: "Schatzsuche (computergestütztes Spiel)",
        treasure_word: "Schatz",

        panel_title: "Hinweise",
        total_fmt: "Schätze insgesamt: {}",
        uniform_fmt: "{} hat Wahrscheinlichkeit {}",
        equation_fmt: "{} = {}",
        field_fmt: "A hat Wahrscheinlichkeit: {}",

        status_fmt: " Gefunden: {} / {}   Geöffnet: {} / {} ",
        status_cleared: "Alle Schätze gefunden!",
        key_new: "Neu",
        key_lang: "English",
        key_exit: "Ende",

        tsmsg_line1: "Terminalfenster zu klein",
        tsmsg_line2: "Mindestgröße: {} x {}",
        tsmsg_title: "Größe anpassen",

        lang_name: "Deutsch",
    }
}

/// Replace each `{}` in `template` with the next argument
pub fn fill(template: &str, args: &[&dyn Display]) -> String {
    let mut out = template.to_string();
    for arg in args {
        out = out.replacen("{}", &arg.to_string(), 1);
    }
    out
}

fn probability(formula: &Formula) -> String {
    format!("{:.2}", formula.probability().unwrap_or_default())
}

fn normalize(lang_code: &str) -> &'static str {
    if lang_code.to_lowercase().starts_with("de") {
        "de"
    } else {
        "en"
    }
}

pub struct Lang {
    pub current_lang: String,
    pub assets: Assets,
}

impl Lang {
    /// Normalizes input (e.g. "de-AT" -> "de"); anything unsupported falls back to English
    pub fn new(lang_code: &str) -> Self {
        let code = normalize(lang_code);
        Lang {
            current_lang: code.to_string(),
            assets: if code == "de" {
                german_assets()
            } else {
                english_assets()
            },
        }
    }

    pub fn switch_to(&mut self, lang_code: &str) {
        *self = Lang::new(lang_code);
    }

    /// Flip between English and German, returning the new code
    pub fn toggle(&mut self) -> &str {
        let next = if self.current_lang == "de" { "en" } else { "de" };
        self.switch_to(next);
        &self.current_lang
    }

    /// Render a hint line in the current language
    pub fn formula(&self, formula: &Formula) -> String {
        let a = &self.assets;
        match formula {
            Formula::Total(n) => fill(a.total_fmt, &[n]),
            Formula::Uniform { label, .. } => fill(a.uniform_fmt, &[label, &probability(formula)]),
            Formula::Field { .. } => fill(a.field_fmt, &[&probability(formula)]),
            Formula::Equation { labels, rhs } => fill(a.equation_fmt, &[&labels.join(" + "), rhs]),
        }
    }
}
