use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

pub const TAROT_KEYWORDS: usize = 2;
pub const TAROT_LIGHT: usize = 3;
pub const TAROT_SHADOW: usize = 3;

const KNOWN_TYPES: [&str; 3] = ["SIMPLE", "SIMPLE_WITH_TITLE", "TEMP_TAROT"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Fortune {
    Simple {
        text: String,
    },
    SimpleWithTitle {
        title: String,
        text: String,
    },
    TempTarot {
        title: String,
        keywords: Vec<String>,
        light: Vec<String>,
        shadow: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnrecognizedFortune {
    #[serde(rename = "type")]
    pub kind: String,
}

/// One record of the catalog document. Unknown `type`s are kept so the kiosk
/// can acknowledge them instead of refusing the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CatalogEntry {
    Known(Fortune),
    Unrecognized(UnrecognizedFortune),
}

#[derive(Debug, Deserialize)]
pub struct CatalogDocument {
    pub fortunes: Vec<CatalogEntry>,
}

/// A fortune with its random choices already made, ready to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reading {
    Simple {
        text: String,
    },
    Titled {
        title: String,
        text: String,
    },
    Tarot {
        title: String,
        keywords: Vec<String>,
        light: Vec<String>,
        shadow: Vec<String>,
    },
    Unrecognized {
        kind: String,
    },
}

impl CatalogEntry {
    pub fn check(&self) -> Result<(), String> {
        if let Self::Unrecognized(entry) = self
            && KNOWN_TYPES.contains(&entry.kind.as_str())
        {
            return Err(format!("malformed {} record", entry.kind));
        }

        let Self::Known(Fortune::TempTarot {
            keywords,
            light,
            shadow,
            ..
        }) = self
        else {
            return Ok(());
        };

        for (field, values, min) in [
            ("keywords", keywords, TAROT_KEYWORDS),
            ("light", light, TAROT_LIGHT),
            ("shadow", shadow, TAROT_SHADOW),
        ] {
            if values.len() < min {
                return Err(format!(
                    "TEMP_TAROT needs at least {min} {field}, found {}",
                    values.len()
                ));
            }
        }
        Ok(())
    }

    /// Samples tarot lines without replacement; other shapes are copied as-is.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Reading {
        match self {
            Self::Known(Fortune::Simple { text }) => Reading::Simple { text: text.clone() },
            Self::Known(Fortune::SimpleWithTitle { title, text }) => Reading::Titled {
                title: title.clone(),
                text: text.clone(),
            },
            Self::Known(Fortune::TempTarot {
                title,
                keywords,
                light,
                shadow,
            }) => Reading::Tarot {
                title: title.clone(),
                keywords: sample(keywords, TAROT_KEYWORDS, rng),
                light: sample(light, TAROT_LIGHT, rng),
                shadow: sample(shadow, TAROT_SHADOW, rng),
            },
            Self::Unrecognized(entry) => Reading::Unrecognized {
                kind: entry.kind.clone(),
            },
        }
    }
}

fn sample<R: Rng + ?Sized>(values: &[String], amount: usize, rng: &mut R) -> Vec<String> {
    values.choose_multiple(rng, amount).cloned().collect()
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn lines(prefix: &str, count: usize) -> Vec<String> {
        (0..count).map(|i| format!("{prefix}{i}")).collect()
    }

    #[test]
    fn unknown_types_are_preserved() {
        let entry: CatalogEntry =
            serde_json::from_str(r#"{"type": "HAIKU", "lines": []}"#).unwrap();
        assert_eq!(
            entry,
            CatalogEntry::Unrecognized(UnrecognizedFortune {
                kind: "HAIKU".into()
            })
        );
    }

    #[test]
    fn known_types_use_screaming_tags() {
        let entry: CatalogEntry =
            serde_json::from_str(r#"{"type": "SIMPLE_WITH_TITLE", "title": "Hi", "text": "there"}"#)
                .unwrap();
        assert_eq!(
            entry,
            CatalogEntry::Known(Fortune::SimpleWithTitle {
                title: "Hi".into(),
                text: "there".into()
            })
        );
    }

    #[test]
    fn known_type_with_missing_fields_fails_check() {
        let entry: CatalogEntry = serde_json::from_str(r#"{"type": "SIMPLE"}"#).unwrap();
        assert_eq!(entry.check().unwrap_err(), "malformed SIMPLE record");
    }

    #[test]
    fn short_tarot_lists_fail_check() {
        let entry = CatalogEntry::Known(Fortune::TempTarot {
            title: "The Fool".into(),
            keywords: lines("k", 2),
            light: lines("l", 2),
            shadow: lines("s", 3),
        });
        let err = entry.check().unwrap_err();
        assert!(err.contains("light"), "{err}");
    }

    #[test]
    fn tarot_draw_samples_distinct_lines() {
        let entry = CatalogEntry::Known(Fortune::TempTarot {
            title: "The Tower".into(),
            keywords: lines("k", 5),
            light: lines("l", 6),
            shadow: lines("s", 3),
        });
        let mut rng = StdRng::seed_from_u64(11);

        let Reading::Tarot {
            keywords,
            light,
            shadow,
            ..
        } = entry.draw(&mut rng)
        else {
            panic!("expected a tarot reading");
        };

        assert_eq!(keywords.len(), TAROT_KEYWORDS);
        assert_ne!(keywords[0], keywords[1]);
        assert_eq!(light.len(), TAROT_LIGHT);
        assert!(light.iter().all(|line| line.starts_with('l')));
        assert_eq!(shadow.len(), TAROT_SHADOW);
    }
}
