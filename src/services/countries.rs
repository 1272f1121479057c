use serde::Deserialize;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::common::{AppEvent, Country};
use crate::error::CountryError;

#[derive(Debug, Deserialize)]
struct RawCountry {
    name: RawName,
    cca2: String,
    #[serde(default)]
    idd: Option<RawIdd>,
    #[serde(default)]
    flags: Option<RawFlags>,
}

#[derive(Debug, Deserialize)]
struct RawName {
    common: String,
}

#[derive(Debug, Deserialize)]
struct RawIdd {
    #[serde(default)]
    root: Option<String>,
    #[serde(default)]
    suffixes: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawFlags {
    #[serde(default)]
    svg: Option<String>,
}

impl RawCountry {
    fn dial_code(&self) -> String {
        let Some(idd) = &self.idd else {
            return String::new();
        };
        match idd.root.as_deref() {
            Some(root) if !root.is_empty() => {
                let suffix = idd
                    .suffixes
                    .as_ref()
                    .and_then(|suffixes| suffixes.first())
                    .map(String::as_str)
                    .unwrap_or_default();
                format!("{root}{suffix}")
            }
            _ => String::new(),
        }
    }

    fn into_country(self) -> Country {
        let dial_code = self.dial_code();
        Country {
            name: self.name.common,
            code: self.cca2,
            dial_code,
            flag: self.flags.and_then(|f| f.svg).unwrap_or_default(),
        }
    }
}

/// Maps a restcountries payload, dropping entries without a dial code.
pub fn parse_countries(json: &str) -> Result<Vec<Country>, CountryError> {
    let raw: Vec<RawCountry> = serde_json::from_str(json)?;
    let mut countries: Vec<Country> = raw
        .into_iter()
        .map(RawCountry::into_country)
        .filter(|country| !country.dial_code.is_empty())
        .collect();
    countries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(countries)
}

pub async fn fetch_countries(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<Country>, CountryError> {
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    parse_countries(&body)
}

/// Used when the country endpoint cannot be reached.
pub fn fallback_countries() -> Vec<Country> {
    [
        ("Australia", "AU", "+61"),
        ("Canada", "CA", "+1"),
        ("Germany", "DE", "+49"),
        ("India", "IN", "+91"),
        ("Japan", "JP", "+81"),
        ("United Kingdom", "GB", "+44"),
        ("United States", "US", "+1"),
        ("Vietnam", "VN", "+84"),
    ]
    .into_iter()
    .map(|(name, code, dial_code)| Country {
        name: name.to_string(),
        code: code.to_string(),
        dial_code: dial_code.to_string(),
        flag: String::new(),
    })
    .collect()
}

/// Fetches the country list in the background and reports it as an event.
pub fn spawn_country_fetch(runtime: &Handle, events: mpsc::Sender<AppEvent>, url: String) {
    runtime.spawn(async move {
        let client = reqwest::Client::new();
        let event = match fetch_countries(&client, &url).await {
            Ok(countries) => {
                log::info!("Loaded {} countries", countries.len());
                AppEvent::CountriesLoaded {
                    countries,
                    fallback: false,
                }
            }
            Err(err) => {
                log::warn!("Failed to fetch countries from {url}: {err}");
                AppEvent::CountriesLoaded {
                    countries: fallback_countries(),
                    fallback: true,
                }
            }
        };
        if let Err(err) = events.send(event).await {
            log::warn!("Failed to deliver country list: {err}");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"name": {"common": "Vietnam", "official": "Socialist Republic of Vietnam"},
         "cca2": "VN", "idd": {"root": "+8", "suffixes": ["4"]},
         "flags": {"png": "vn.png", "svg": "vn.svg"}},
        {"name": {"common": "Antarctica"}, "cca2": "AQ", "idd": {}, "flags": {"svg": "aq.svg"}},
        {"name": {"common": "United States"}, "cca2": "US",
         "idd": {"root": "+1", "suffixes": ["201", "202"]}},
        {"name": {"common": "Kosovo"}, "cca2": "XK", "idd": {"root": "+3", "suffixes": []}}
    ]"#;

    #[test]
    fn maps_and_filters_payload() {
        let countries = parse_countries(SAMPLE).unwrap();
        let codes: Vec<_> = countries.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, ["XK", "US", "VN"]);

        let vietnam = &countries[2];
        assert_eq!(vietnam.dial_code, "+84");
        assert_eq!(vietnam.flag, "vn.svg");
        assert_eq!(vietnam.label(), "Vietnam (+84)");

        // First suffix only, missing flag left empty.
        assert_eq!(countries[1].dial_code, "+1201");
        assert_eq!(countries[1].flag, "");
        assert_eq!(countries[0].dial_code, "+3");
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(matches!(
            parse_countries("{\"status\": 404}"),
            Err(CountryError::Decode(_))
        ));
    }

    #[test]
    fn fallback_has_dial_codes() {
        let countries = fallback_countries();
        assert!(!countries.is_empty());
        assert!(countries.iter().all(|c| c.dial_code.starts_with('+')));
    }
}
