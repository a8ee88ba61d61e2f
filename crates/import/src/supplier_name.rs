use std::sync::LazyLock;

use regex::Regex;

/// Suggest a supplier name from an uploaded file name.
///
/// "Acme_Wines_Price_List_2024-11-15_v2.xlsx" becomes "Acme Wines". Falls
/// back to the part before the first dot when nothing is left.
pub fn supplier_from_filename(filename: &str) -> String {
    static NOISE: LazyLock<[(Regex, &str); 7]> = LazyLock::new(|| {
        [
            (Regex::new(r"(?i)\.(xlsx?|csv|pdf)$").expect("valid regex"), ""),
            (Regex::new(r"(?i)[-_ ]price[-_ ]?list").expect("valid regex"), ""),
            (Regex::new(r"[-_ ]\d{4}[-_]\d{2}[-_]\d{2}").expect("valid regex"), ""),
            // Whole month tokens only, with an optional year; the separator after is kept.
            (
                Regex::new(
                    r"(?i)[-_ ](?:january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec)(?:[-_ ]?\d{4})?(?P<tail>[-_ ]|$)",
                )
                .expect("valid regex"),
                "$tail",
            ),
            (Regex::new(r"(?i)[-_]final").expect("valid regex"), ""),
            (Regex::new(r"(?i)[-_]updated").expect("valid regex"), ""),
            (Regex::new(r"(?i)[-_]v?\d+$").expect("valid regex"), ""),
        ]
    });
    static SEPARATORS: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[-_\s]+").expect("valid regex"));

    let mut name = filename.trim().to_string();
    for (re, replacement) in NOISE.iter() {
        name = re.replace_all(&name, *replacement).into_owned();
    }
    let name = SEPARATORS.replace_all(&name, " ").trim().to_string();

    if name.is_empty() {
        filename.split('.').next().unwrap_or(filename).trim().to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_price_list_dates_and_versions() {
        assert_eq!(
            supplier_from_filename("Acme_Wines_Price_List_2024-11-15_v2.xlsx"),
            "Acme Wines"
        );
        assert_eq!(supplier_from_filename("acme-pricelist.csv"), "acme");
    }

    #[test]
    fn strips_month_final_and_updated() {
        assert_eq!(
            supplier_from_filename("Vineyard-Brands-November-2024-FINAL.xls"),
            "Vineyard Brands"
        );
        assert_eq!(supplier_from_filename("Kermit_Lynch_updated.pdf"), "Kermit Lynch");
    }

    #[test]
    fn month_tokens_are_stripped_with_their_year() {
        assert_eq!(supplier_from_filename("Acme_Wines_Nov_2024.csv"), "Acme Wines");
        assert_eq!(supplier_from_filename("Acme Wines March.pdf"), "Acme Wines");
    }

    #[test]
    fn words_that_start_like_months_survive() {
        assert_eq!(supplier_from_filename("Dan Marshall Wines.xlsx"), "Dan Marshall Wines");
        assert_eq!(
            supplier_from_filename("Napa Decanter Selections.csv"),
            "Napa Decanter Selections"
        );
        assert_eq!(supplier_from_filename("Pine Ridge Mayacamas.xls"), "Pine Ridge Mayacamas");
    }

    #[test]
    fn space_separated_words_are_not_treated_as_noise() {
        assert_eq!(supplier_from_filename("Final Cut Imports.csv"), "Final Cut Imports");
        assert_eq!(supplier_from_filename("Chateau 1855.csv"), "Chateau 1855");
    }

    #[test]
    fn falls_back_to_stem_when_everything_is_noise() {
        assert_eq!(supplier_from_filename("_price_list.csv"), "_price_list");
    }
}
