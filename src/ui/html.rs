// ============================================================================
// Rendu HTML de la zone de résultats
// ============================================================================
// Transforme une OptionsResponse (ou une erreur) en fragment HTML
//
// CONCEPTS RUST :
// 1. Fonctions pures : même entrée -> même sortie (rendu déterministe)
// 2. std::fmt::Write : write!() directement dans une String
// 3. Échappement : tout texte venant du serveur passe par escape()
// ============================================================================

use std::fmt::Write;

use crate::error::PresenterError;
use crate::models::{ExpirationSummary, OptionQuote, OptionsResponse};

/// Message affiché quand une expiration n'a aucune option retenue
pub const NO_OPTIONS_MESSAGE: &str = "No options meet the criteria for this expiration.";

/// Texte de l'indicateur de chargement
pub const LOADING_MESSAGE: &str = "Loading...";

/// Colonnes fixes du tableau d'options
pub const TABLE_COLUMNS: [&str; 8] = [
    "Strike",
    "Bid",
    "Ask",
    "Delta",
    "IV",
    "Volume",
    "OI",
    "Ann. Return",
];

// ============================================================================
// Formatage des nombres
// ============================================================================

/// Nombre avec `decimals` décimales (ex: fixed(-0.1234, 3) = "-0.123")
///
/// Une valeur exactement à mi-chemin (0.125 avec 2 décimales) est arrondie
/// en s'éloignant de zéro, comme Number.prototype.toFixed côté navigateur.
/// `{:.N}` arrondirait au pair ("0.12").
pub fn fixed(value: f64, decimals: usize) -> String {
    if !is_exact_tie(value, decimals) {
        return format!("{:.*}", decimals, value);
    }

    // Le développement décimal s'arrête au rang decimals+1 et finit par '5' :
    // on retire ce '5' et on ajoute une unité au dernier chiffre gardé
    let exact = format!("{:.*}", decimals + 1, value.abs());
    let mut digits: Vec<u8> = exact.into_bytes();
    digits.pop();
    if digits.last() == Some(&b'.') {
        digits.pop();
    }

    let mut carry = true;
    for digit in digits.iter_mut().rev() {
        if !carry {
            break;
        }
        match *digit {
            b'.' => continue,
            b'9' => *digit = b'0',
            _ => {
                *digit += 1;
                carry = false;
            }
        }
    }
    if carry {
        digits.insert(0, b'1');
    }

    let rounded = String::from_utf8_lossy(&digits).into_owned();
    if value.is_sign_negative() {
        format!("-{}", rounded)
    } else {
        rounded
    }
}

/// Vrai si `value * 10^decimals` a une partie fractionnaire d'exactement 1/2
///
/// CONCEPT RUST : to_bits()
/// - Un f64 fini vaut m * 2^e (m entier sur 53 bits)
/// - value * 10^d = m * 5^d * 2^(d+e) : la fraction vaut exactement 1/2
///   quand la puissance de 2 de m * 2^d est égale à -e - 1
fn is_exact_tie(value: f64, decimals: usize) -> bool {
    if !value.is_finite() || value == 0.0 {
        return false;
    }

    let bits = value.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    };

    exponent < 0 && mantissa.trailing_zeros() as i64 + decimals as i64 == -exponent - 1
}

/// Montant en dollars, 2 décimales (ex: "$123.40")
pub fn currency(value: f64) -> String {
    format!("${}", fixed(value, 2))
}

/// Fraction affichée en pourcentage (ex: 0.256 -> "25.60%")
pub fn percent(value: f64) -> String {
    format!("{}%", fixed(value * 100.0, 2))
}

/// Valeur optionnelle : "N/A" si le serveur a envoyé null
fn or_na(value: Option<f64>, format: impl Fn(f64) -> String) -> String {
    value.map(format).unwrap_or_else(|| "N/A".to_string())
}

/// Échappe les caractères spéciaux HTML
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// ============================================================================
// Fragments
// ============================================================================

/// Indicateur de chargement
pub fn render_loading() -> String {
    format!("<p class=\"loading\">{}</p>", LOADING_MESSAGE)
}

/// Un seul paragraphe contenant le texte de l'erreur
pub fn render_error(error: &PresenterError) -> String {
    format!("<p class=\"error\">{}</p>", escape(&error.to_string()))
}

/// Résultats complets : prix actuel puis une section par expiration
///
/// Les expirations sont rendues dans l'ordre du serveur.
pub fn render_options(response: &OptionsResponse) -> String {
    let mut html = String::new();

    // CONCEPT RUST : write! sur une String ne peut pas échouer,
    // le Result est ignoré avec `let _`
    let _ = write!(
        html,
        "<h2>Current Price: {}</h2>",
        currency(response.current_price)
    );

    for (label, summary) in response.expirations.iter() {
        render_expiration(&mut html, label, summary);
    }

    html
}

fn render_expiration(html: &mut String, label: &str, summary: &ExpirationSummary) {
    let _ = write!(html, "<h3>Expiration: {}</h3>", escape(label));

    let _ = write!(
        html,
        "<div class=\"summary\">\
         <p>Put/Call Ratio: {}</p>\
         <p>Outlook: <span class=\"{}\">{}</span></p>\
         <p>Max Pain: {}</p>\
         <p>Expected Move: {}</p>\
         </div>",
        or_na(summary.put_call_ratio, |v| fixed(v, 2)),
        escape(&summary.outlook.css_class()),
        escape(summary.outlook.label()),
        or_na(summary.max_pain, currency),
        or_na(summary.expected_move, currency),
    );

    if !summary.has_options() {
        let _ = write!(html, "<p class=\"no-options\">{}</p>", NO_OPTIONS_MESSAGE);
        return;
    }

    html.push_str("<table><thead><tr>");
    for column in TABLE_COLUMNS {
        let _ = write!(html, "<th>{}</th>", column);
    }
    html.push_str("</tr></thead><tbody>");

    for option in &summary.options {
        render_row(html, option);
    }

    html.push_str("</tbody></table>");
}

fn render_row(html: &mut String, option: &OptionQuote) {
    let cells = [
        currency(option.strike),
        currency(option.bid),
        currency(option.ask),
        fixed(option.delta, 3),
        percent(option.implied_volatility),
        option.volume.to_string(),
        option.open_interest.to_string(),
        escape(&option.annualized_return),
    ];

    html.push_str("<tr>");
    for cell in cells {
        let _ = write!(html, "<td>{}</td>", cell);
    }
    html.push_str("</tr>");
}

// ============================================================================
// Tests unitaires
// ============================================================================
