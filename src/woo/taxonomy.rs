// Static lookup tables: term → topics and topic → Woo categories.
//
// Both tables are built once (from the built-in defaults or a JSON file) and
// then only read. The analyzer receives them by value at construction, so no
// stage reaches for global state.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AnalysisError, WooResult};

/// The ten information categories of Art. 3.3 Woo.
///
/// Declaration order is the canonical report order; `Ord` is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WooCategory {
    Convenanten,
    Jaarplannen,
    Onderzoeksrapporten,
    Adviezen,
    Subsidiebeschikkingen,
    WobBeschikkingen,
    WooBeschikkingen,
    Vergaderstukken,
    BestuurlijkeBesluiten,
    Beleidsnotas,
}

impl WooCategory {
    pub const ALL: [WooCategory; 10] = [
        WooCategory::Convenanten,
        WooCategory::Jaarplannen,
        WooCategory::Onderzoeksrapporten,
        WooCategory::Adviezen,
        WooCategory::Subsidiebeschikkingen,
        WooCategory::WobBeschikkingen,
        WooCategory::WooBeschikkingen,
        WooCategory::Vergaderstukken,
        WooCategory::BestuurlijkeBesluiten,
        WooCategory::Beleidsnotas,
    ];

    pub fn code(self) -> &'static str {
        match self {
            WooCategory::Convenanten => "1a",
            WooCategory::Jaarplannen => "1b",
            WooCategory::Onderzoeksrapporten => "1c",
            WooCategory::Adviezen => "1d",
            WooCategory::Subsidiebeschikkingen => "1e",
            WooCategory::WobBeschikkingen => "1f",
            WooCategory::WooBeschikkingen => "1g",
            WooCategory::Vergaderstukken => "2",
            WooCategory::BestuurlijkeBesluiten => "3",
            WooCategory::Beleidsnotas => "4",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WooCategory::Convenanten => "Convenanten",
            WooCategory::Jaarplannen => "Jaarplannen en jaarverslagen",
            WooCategory::Onderzoeksrapporten => "Onderzoeksrapporten",
            WooCategory::Adviezen => "Adviezen van adviescolleges",
            WooCategory::Subsidiebeschikkingen => "Beschikkingen over aanvragen om een subsidie",
            WooCategory::WobBeschikkingen => "Beschikkingen Wob-verzoeken",
            WooCategory::WooBeschikkingen => "Beschikkingen Woo-verzoeken",
            WooCategory::Vergaderstukken => "Vergaderstukken bestuursorganen",
            WooCategory::BestuurlijkeBesluiten => "Bestuurlijke besluiten",
            WooCategory::Beleidsnotas => "Regelingen en beleidsnota's",
        }
    }
}

impl fmt::Display for WooCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for WooCategory {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_lowercase();
        WooCategory::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| AnalysisError::Taxonomy(format!("unknown Woo category code '{s}'")))
    }
}

impl Serialize for WooCategory {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for WooCategory {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}

/// Normalized term → topics. Every term maps to at least one topic.
#[derive(Debug, Clone)]
pub struct TopicTaxonomy {
    terms: BTreeMap<String, BTreeSet<String>>,
}

impl TopicTaxonomy {
    /// Build a taxonomy, normalizing terms to lowercase and rejecting empty topic sets.
    pub fn new<I, T, V>(entries: I) -> WooResult<Self>
    where
        I: IntoIterator<Item = (T, V)>,
        T: AsRef<str>,
        V: IntoIterator,
        V::Item: AsRef<str>,
    {
        let mut terms: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (term, topics) in entries {
            let term = term.as_ref().trim().to_lowercase();
            if term.is_empty() {
                return Err(AnalysisError::Taxonomy("empty taxonomy term".to_string()));
            }
            let topics: BTreeSet<String> = topics
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect();
            if topics.is_empty() {
                return Err(AnalysisError::Taxonomy(format!(
                    "term '{term}' maps to no topics"
                )));
            }
            terms.entry(term).or_default().extend(topics);
        }
        Ok(Self { terms })
    }

    pub fn get(&self, term: &str) -> Option<&BTreeSet<String>> {
        self.terms.get(term)
    }

    /// All terms in sorted order, with their topics.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.terms.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// One topic → category link with the reason shown in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    #[serde(rename = "code")]
    pub category: WooCategory,
    pub justification: String,
}

/// Topic → category rules. A topic may have none; a category may be reached by many topics.
#[derive(Debug, Clone, Default)]
pub struct CategoryRules {
    rules: BTreeMap<String, Vec<CategoryRule>>,
}

impl CategoryRules {
    pub fn new<I, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (T, Vec<CategoryRule>)>,
        T: AsRef<str>,
    {
        let mut rules: BTreeMap<String, Vec<CategoryRule>> = BTreeMap::new();
        for (topic, topic_rules) in entries {
            rules
                .entry(topic.as_ref().trim().to_lowercase())
                .or_default()
                .extend(topic_rules);
        }
        Self { rules }
    }

    /// Rules for a topic; empty when the topic has no Woo link.
    pub fn for_topic(&self, topic: &str) -> &[CategoryRule] {
        self.rules.get(topic).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn topic_count(&self) -> usize {
        self.rules.len()
    }
}

/// On-disk shape of a replacement table file.
///
/// ```json
/// {
///   "terms": { "parkeren": ["verkeer", "mobiliteit"] },
///   "rules": { "verkeer": [{ "code": "3", "justification": "..." }] }
/// }
/// ```
#[derive(Debug, Deserialize)]
struct TableFile {
    terms: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    rules: BTreeMap<String, Vec<CategoryRule>>,
}

/// Both lookup tables, loaded together.
#[derive(Debug, Clone)]
pub struct WooTables {
    pub taxonomy: TopicTaxonomy,
    pub rules: CategoryRules,
}

impl WooTables {
    /// The tables that ship with the crate.
    pub fn builtin() -> Self {
        let taxonomy = TopicTaxonomy {
            terms: TERM_TOPICS
                .iter()
                .map(|(term, topics)| {
                    (
                        term.to_string(),
                        topics.iter().map(|t| t.to_string()).collect(),
                    )
                })
                .collect(),
        };

        let rules = CategoryRules::new(TOPIC_RULES.iter().map(|(topic, links)| {
            let links = links
                .iter()
                .map(|(category, justification)| CategoryRule {
                    category: *category,
                    justification: justification.to_string(),
                })
                .collect();
            (*topic, links)
        }));

        Self { taxonomy, rules }
    }

    /// Parse tables from JSON text.
    pub fn from_json(json: &str) -> WooResult<Self> {
        let file: TableFile = serde_json::from_str(json)?;
        let taxonomy = TopicTaxonomy::new(file.terms)?;
        let rules = CategoryRules::new(file.rules);
        Ok(Self { taxonomy, rules })
    }

    /// Load tables from a JSON file on disk.
    pub fn load(path: &Path) -> WooResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let tables = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            terms = tables.taxonomy.len(),
            topics = tables.rules.topic_count(),
            "Loaded Woo tables from file"
        );
        Ok(tables)
    }
}

impl Default for WooTables {
    fn default() -> Self {
        Self::builtin()
    }
}

// Stem variants ("parkeer", "woon") are listed as terms of their own so the
// substring fallback catches Dutch compounds like "parkeertarieven".
const TERM_TOPICS: &[(&str, &[&str])] = &[
    // Ruimte en infrastructuur
    ("afval", &["milieu", "openbare ruimte", "beheer", "huisvesting"]),
    ("parkeren", &["verkeer", "mobiliteit", "openbare ruimte", "handhaving"]),
    ("parkeer", &["verkeer", "mobiliteit", "openbare ruimte", "handhaving"]),
    ("verkeer", &["mobiliteit", "infrastructuur", "veiligheid", "openbare ruimte"]),
    ("bus", &["openbaar vervoer", "mobiliteit", "infrastructuur"]),
    ("fiets", &["mobiliteit", "infrastructuur", "openbare ruimte"]),
    ("straat", &["openbare ruimte", "beheer", "infrastructuur"]),
    ("woning", &["huisvesting", "ruimtelijke ordening", "bouw"]),
    ("woon", &["huisvesting", "ruimtelijke ordening"]),
    ("bouw", &["ruimtelijke ordening", "vergunningen", "handhaving"]),
    ("bestemmingsplan", &["ruimtelijke ordening", "regelgeving"]),
    // Sociaal domein
    ("jeugd", &["jeugdzorg", "welzijn", "onderwijs", "zorg"]),
    ("zorg", &["gezondheidszorg", "welzijn", "sociaal domein"]),
    ("onderwijs", &["educatie", "jeugd", "cultuur"]),
    ("werk", &["arbeidsmarkt", "economie", "sociale zaken"]),
    // Milieu en duurzaamheid
    ("milieu", &["duurzaamheid", "klimaat", "natuur"]),
    ("energie", &["duurzaamheid", "klimaat", "milieu"]),
    ("water", &["waterbeheer", "milieu", "infrastructuur"]),
    ("groen", &["natuur", "openbare ruimte", "milieu"]),
    // Veiligheid en handhaving
    ("veiligheid", &["openbare orde", "handhaving", "politie"]),
    ("criminaliteit", &["veiligheid", "politie", "handhaving"]),
    ("overlast", &["openbare orde", "handhaving", "veiligheid"]),
    // Bestuur en financiën
    ("subsidie", &["financiën", "beleid", "ondersteuning"]),
    ("beleid", &["bestuur", "regelgeving", "strategie"]),
    ("financiën", &["begroting", "subsidie", "economie"]),
    ("vergunning", &["handhaving", "regelgeving", "bouw"]),
    // Documentsoorten
    ("convenant", &["samenwerking"]),
    ("overeenkomst", &["samenwerking"]),
    ("jaarplan", &["verantwoording"]),
    ("jaarverslag", &["verantwoording"]),
    ("begroting", &["verantwoording", "financiën"]),
    ("onderzoek", &["onderzoek"]),
    ("rapport", &["onderzoek"]),
    ("evaluatie", &["onderzoek"]),
    ("monitor", &["onderzoek"]),
    ("advies", &["advisering"]),
    ("commissie", &["advisering", "bestuur"]),
    ("wob", &["openbaarheid"]),
    ("woo", &["openbaarheid"]),
    ("openbaarmaking", &["openbaarheid"]),
    ("besluit", &["besluitvorming"]),
    ("beschikking", &["besluitvorming"]),
    ("verordening", &["besluitvorming", "regelgeving"]),
    ("gemeenteraad", &["bestuur"]),
    ("vergadering", &["bestuur"]),
    ("regeling", &["regelgeving"]),
];

use WooCategory::*;

const TOPIC_RULES: &[(&str, &[(WooCategory, &str)])] = &[
    ("samenwerking", &[(Convenanten, "Samenwerkingsafspraken worden vastgelegd in convenanten.")]),
    ("openbaar vervoer", &[(Convenanten, "Afspraken met vervoerders en de regio worden vastgelegd in convenanten.")]),
    ("verantwoording", &[(Jaarplannen, "Plannen en verantwoording verschijnen in jaarplannen en jaarverslagen.")]),
    ("beheer", &[(Jaarplannen, "Beheer en onderhoud worden gepland en verantwoord in jaarplannen en jaarverslagen.")]),
    ("begroting", &[(Jaarplannen, "Begroting en uitputting staan in jaarplannen en jaarverslagen.")]),
    ("infrastructuur", &[(Jaarplannen, "Investeringen in infrastructuur staan in jaarplannen en jaarverslagen.")]),
    ("economie", &[(Jaarplannen, "Economische ontwikkeling wordt gevolgd in jaarverslagen.")]),
    (
        "mobiliteit",
        &[
            (Jaarplannen, "Mobiliteitsplannen en voortgangsrapportages verschijnen als jaarplan of jaarverslag."),
            (Beleidsnotas, "Mobiliteitsbeleid is vastgelegd in beleidsnota's."),
        ],
    ),
    (
        "verkeer",
        &[
            (Onderzoeksrapporten, "Verkeerstellingen en verkeersonderzoeken worden gepubliceerd als onderzoeksrapport."),
            (BestuurlijkeBesluiten, "Verkeersbesluiten zijn bestuurlijke besluiten."),
        ],
    ),
    ("onderzoek", &[(Onderzoeksrapporten, "Onderzoek en evaluaties worden openbaar gemaakt als onderzoeksrapport.")]),
    (
        "milieu",
        &[
            (Onderzoeksrapporten, "Milieumetingen en -onderzoeken worden gepubliceerd als onderzoeksrapport."),
            (Beleidsnotas, "Milieubeleid is vastgelegd in beleidsnota's."),
        ],
    ),
    ("arbeidsmarkt", &[(Onderzoeksrapporten, "Arbeidsmarktanalyses verschijnen als onderzoeksrapport.")]),
    ("duurzaamheid", &[(Beleidsnotas, "Duurzaamheidsambities staan in beleidsnota's.")]),
    ("klimaat", &[(Beleidsnotas, "Klimaatbeleid is vastgelegd in beleidsnota's.")]),
    ("advisering", &[(Adviezen, "Adviescolleges brengen hierover adviezen uit.")]),
    ("subsidie", &[(Subsidiebeschikkingen, "Gerelateerd aan subsidies.")]),
    ("financiën", &[(Subsidiebeschikkingen, "Financiële ondersteuning loopt via subsidiebeschikkingen.")]),
    ("ondersteuning", &[(Subsidiebeschikkingen, "Ondersteuning wordt verleend via subsidiebeschikkingen.")]),
    ("welzijn", &[(Subsidiebeschikkingen, "Welzijnswerk wordt grotendeels gesubsidieerd.")]),
    ("cultuur", &[(Subsidiebeschikkingen, "Culturele instellingen ontvangen subsidiebeschikkingen.")]),
    (
        "openbaarheid",
        &[
            (WobBeschikkingen, "Eerdere openbaarmakingsverzoeken zijn afgehandeld als Wob-besluit."),
            (WooBeschikkingen, "Openbaarmakingsverzoeken worden afgehandeld als Woo-besluit."),
        ],
    ),
    ("bestuur", &[(Vergaderstukken, "Bestuurlijke besluitvorming wordt voorbereid in vergaderstukken.")]),
    ("politie", &[(Vergaderstukken, "Veiligheid wordt besproken in het driehoeksoverleg en de raad.")]),
    ("besluitvorming", &[(BestuurlijkeBesluiten, "Besluiten en beschikkingen zijn bestuurlijke besluiten.")]),
    ("openbare ruimte", &[(BestuurlijkeBesluiten, "Inrichting en gebruik van de openbare ruimte worden vastgelegd in bestuurlijke besluiten.")]),
    ("handhaving", &[(BestuurlijkeBesluiten, "Handhavingsbesluiten zijn bestuurlijke besluiten.")]),
    ("vergunningen", &[(BestuurlijkeBesluiten, "Verleende en geweigerde vergunningen zijn bestuurlijke besluiten.")]),
    ("openbare orde", &[(BestuurlijkeBesluiten, "Maatregelen voor de openbare orde worden genomen bij bestuurlijk besluit.")]),
    (
        "ruimtelijke ordening",
        &[
            (BestuurlijkeBesluiten, "Bestemmingsplannen en omgevingsbesluiten zijn bestuurlijke besluiten."),
            (Beleidsnotas, "Ruimtelijke visies zijn vastgelegd in beleidsnota's."),
        ],
    ),
    ("huisvesting", &[(Beleidsnotas, "Huisvestingsbeleid is vastgelegd in regelingen en beleidsnota's.")]),
    ("beleid", &[(Beleidsnotas, "Gerelateerd aan beleid en regelgeving.")]),
    ("regelgeving", &[(Beleidsnotas, "Gerelateerd aan beleid en regelgeving.")]),
    ("strategie", &[(Beleidsnotas, "Strategische keuzes zijn vastgelegd in beleidsnota's.")]),
    ("veiligheid", &[(Beleidsnotas, "Integraal veiligheidsbeleid is vastgelegd in beleidsnota's.")]),
    ("sociaal domein", &[(Beleidsnotas, "Het sociaal domein is geregeld in verordeningen en beleidsnota's.")]),
    ("jeugdzorg", &[(Beleidsnotas, "Jeugdhulp is geregeld in verordeningen en beleidsnota's.")]),
    ("gezondheidszorg", &[(Beleidsnotas, "Gezondheidsbeleid is vastgelegd in beleidsnota's.")]),
    ("onderwijs", &[(Beleidsnotas, "Onderwijshuisvesting en -beleid zijn vastgelegd in beleidsnota's.")]),
    ("natuur", &[(Beleidsnotas, "Groen- en natuurbeleid is vastgelegd in beleidsnota's.")]),
    ("waterbeheer", &[(Beleidsnotas, "Waterbeheer is vastgelegd in waterplannen en beleidsnota's.")]),
];
