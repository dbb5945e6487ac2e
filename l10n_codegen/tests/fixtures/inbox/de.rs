// Code generated by cargo-l10n; DO NOT EDIT.
use ::core::fmt::Write as _;
use super::Localizer;
/// Localizer for the `de` language.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeLocalizer;
impl DeLocalizer {
    fn items_unread(out: &mut String, folder: &str) {
        out.push_str(" im ");
        Self::items_place(out, folder);
    }
    fn items_place(out: &mut String, folder: &str) {
        out.push_str("Ordner ");
        out.push_str(folder);
    }
}
impl Localizer for DeLocalizer {
    fn title(&self) -> String {
        "Posteingang".to_owned()
    }
    fn items(&self, count: i64, folder: &str) -> String {
        let mut out = String::new();
        match count {
            0 => {
                return "Keine Nachrichten".to_owned();
            }
            1 => {
                out.push_str("Eine Nachricht");
                Self::items_unread(&mut out, folder);
            }
            _ => {
                out.push_str(&count.to_string());
                out.push_str(" Nachrichten");
                Self::items_unread(&mut out, folder);
            }
        }
        out
    }
    fn status(&self, count: i64) -> String {
        match count {
            0 => "leer".to_owned(),
            1 => "einzeln".to_owned(),
            _ => "mehrere".to_owned(),
        }
    }
    fn total(&self, amount: f64, count: i64) -> String {
        let mut out = String::new();
        out.push_str("Summe: ");
        write!(out, "{amount:.2}").ok();
        out.push_str(" fuer ");
        write!(out, "{count:>4}").ok();
        out.push_str(" Artikel");
        out
    }
    fn greeting(&self, name: &dyn ::core::fmt::Display) -> String {
        let mut out = String::new();
        out.push_str("Hallo, ");
        write!(out, "{name}").ok();
        out
    }
}
