use serde_json::{Map, Value, json};
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

pub const CATALOG_ID: &str = "isms.report_catalog";
pub const CATALOG_VERSION: &str = "1";

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

pub const INVENTORY_OF_ASSETS: &str = "inventory-of-assets";
pub const RISK_ASSESSMENT: &str = "risk-assessment";
pub const STATEMENT_OF_APPLICABILITY: &str = "statement-of-applicability";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalizedText {
    pub en: &'static str,
    pub de: &'static str,
}

impl LocalizedText {
    /// Unknown languages fall back to English.
    pub fn get(&self, language: &str) -> &'static str {
        match language.to_ascii_lowercase().as_str() {
            "de" => self.de,
            _ => self.en,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetTypeDef {
    pub model_type: &'static str,
    pub sub_types: Option<&'static [&'static str]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportDef {
    pub id: &'static str,
    pub name: LocalizedText,
    pub description: LocalizedText,
    pub output_types: &'static [&'static str],
    pub multiple_targets_supported: bool,
    pub target_types: &'static [TargetTypeDef],
}

// Every standard report targets scopes; the model type is singular on the wire.
const SCOPE_TARGETS: [TargetTypeDef; 1] = [TargetTypeDef {
    model_type: "scope",
    sub_types: None,
}];

const PDF_ONLY: [&str; 1] = [PDF_CONTENT_TYPE];

pub const REPORT_DEFS_V1: [ReportDef; 3] = [
    ReportDef {
        id: INVENTORY_OF_ASSETS,
        name: LocalizedText {
            en: "Inventory of Assets",
            de: "Bestandsverzeichnis der Assets",
        },
        description: LocalizedText {
            en: "Generates a comprehensive inventory of all assets in the selected scope.",
            de: "Erstellt ein umfassendes Bestandsverzeichnis aller Assets im ausgewählten Scope.",
        },
        output_types: &PDF_ONLY,
        multiple_targets_supported: true,
        target_types: &SCOPE_TARGETS,
    },
    ReportDef {
        id: RISK_ASSESSMENT,
        name: LocalizedText {
            en: "Risk Assessment",
            de: "Risikobewertung",
        },
        description: LocalizedText {
            en: "Generates a detailed risk assessment report for the selected scopes, including all risks for assets and processes within those scopes.",
            de: "Erstellt einen detaillierten Risikobewertungsbericht für die ausgewählten Scopes, einschließlich aller Risiken für Assets und Prozesse innerhalb dieser Scopes.",
        },
        output_types: &PDF_ONLY,
        multiple_targets_supported: true,
        target_types: &SCOPE_TARGETS,
    },
    ReportDef {
        id: STATEMENT_OF_APPLICABILITY,
        name: LocalizedText {
            en: "Statement of Applicability",
            de: "Anwendbarkeitserklärung",
        },
        description: LocalizedText {
            en: "Generates a Statement of Applicability (SoA) report showing which controls are applicable and their implementation status.",
            de: "Erstellt eine Anwendbarkeitserklärung (SoA), die zeigt, welche Controls anwendbar sind und deren Umsetzungsstatus.",
        },
        output_types: &PDF_ONLY,
        multiple_targets_supported: false,
        target_types: &SCOPE_TARGETS,
    },
];

// Aliases are accepted when generating but never listed, so menus show no duplicates.
const REPORT_ALIASES_V1: [(&str, &str); 1] = [("iso-inventory", INVENTORY_OF_ASSETS)];

#[derive(Debug, Clone)]
pub struct CatalogMetadata {
    pub catalog_id: &'static str,
    pub catalog_version: &'static str,
    pub report_count: usize,
    pub catalog_fingerprint_sha256: String,
}

fn hex_sha256(bytes: &[u8]) -> String {
    hex_digest(Sha256::new_with_prefix(bytes))
}

fn hex_digest(hasher: Sha256) -> String {
    let digest = hasher.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        use std::fmt::Write;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

static CATALOG_JSON_VALUE: OnceLock<Value> = OnceLock::new();
static CATALOG_JSON: OnceLock<String> = OnceLock::new();
static CATALOG_FINGERPRINT: OnceLock<String> = OnceLock::new();

pub fn report_defs_v1() -> &'static [ReportDef] {
    &REPORT_DEFS_V1
}

/// Resolves aliases to the canonical report id. Unknown ids yield `None`.
pub fn normalize_report_type(report_type: &str) -> Option<&'static str> {
    if let Some(def) = REPORT_DEFS_V1.iter().find(|d| d.id == report_type) {
        return Some(def.id);
    }
    REPORT_ALIASES_V1
        .iter()
        .find(|(alias, _)| *alias == report_type)
        .map(|(_, canonical)| *canonical)
}

pub fn report_def(report_type: &str) -> Option<&'static ReportDef> {
    let id = normalize_report_type(report_type)?;
    REPORT_DEFS_V1.iter().find(|d| d.id == id)
}

pub fn is_known_report_type(report_type: &str) -> bool {
    normalize_report_type(report_type).is_some()
}

/// `Content-Disposition` filename for a generated report. Known aliases use the
/// canonical id; unknown types keep the requested name with unsafe bytes replaced.
pub fn attachment_filename(report_type: &str) -> String {
    let stem = match normalize_report_type(report_type) {
        Some(id) => id.to_string(),
        None => report_type
            .chars()
            .map(|ch| {
                if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                    ch
                } else {
                    '_'
                }
            })
            .collect(),
    };
    let stem = if stem.is_empty() { "report".to_string() } else { stem };
    format!("{stem}-report.pdf")
}

fn localized_value(text: &LocalizedText) -> Value {
    json!({ "en": text.en, "de": text.de })
}

fn report_def_value(def: &ReportDef) -> Value {
    let targets: Vec<Value> = def
        .target_types
        .iter()
        .map(|t| {
            json!({
                "modelType": t.model_type,
                "subTypes": t.sub_types.map(|s| s.to_vec()),
            })
        })
        .collect();
    json!({
        "name": localized_value(&def.name),
        "description": localized_value(&def.description),
        "outputTypes": def.output_types.to_vec(),
        "multipleTargetsSupported": def.multiple_targets_supported,
        "targetTypes": targets,
    })
}

/// Listing payload keyed by report id, in the shape report clients expect.
pub fn catalog_json_value() -> &'static Value {
    CATALOG_JSON_VALUE.get_or_init(|| {
        let mut reports = Map::new();
        for def in &REPORT_DEFS_V1 {
            reports.insert(def.id.to_string(), report_def_value(def));
        }
        Value::Object(reports)
    })
}

pub fn catalog_json() -> &'static str {
    CATALOG_JSON.get_or_init(|| catalog_json_value().to_string())
}

pub fn catalog_fingerprint_sha256() -> String {
    CATALOG_FINGERPRINT
        .get_or_init(|| {
            let mut hasher = Sha256::new();
            hasher.update(CATALOG_ID.as_bytes());
            hasher.update(b"\n");
            hasher.update(CATALOG_VERSION.as_bytes());
            hasher.update(b"\n");
            hasher.update(hex_sha256(catalog_json().as_bytes()).as_bytes());
            for (alias, canonical) in &REPORT_ALIASES_V1 {
                hasher.update(b"\n");
                hasher.update(alias.as_bytes());
                hasher.update(b"=");
                hasher.update(canonical.as_bytes());
            }
            hex_digest(hasher)
        })
        .clone()
}

pub fn metadata() -> CatalogMetadata {
    CatalogMetadata {
        catalog_id: CATALOG_ID,
        catalog_version: CATALOG_VERSION,
        report_count: REPORT_DEFS_V1.len(),
        catalog_fingerprint_sha256: catalog_fingerprint_sha256(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_fingerprint_is_stable_and_nonempty() {
        let a = catalog_fingerprint_sha256();
        let b = catalog_fingerprint_sha256();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_eq!(metadata().catalog_fingerprint_sha256, a);
    }

    #[test]
    fn digests_share_one_hex_encoding() {
        assert_eq!(
            hex_sha256(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        let mut hasher = Sha256::new();
        hasher.update(b"ab");
        hasher.update(b"c");
        assert_eq!(hex_digest(hasher), hex_sha256(b"abc"));
        let fingerprint = catalog_fingerprint_sha256();
        assert!(fingerprint.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
    }

    #[test]
    fn alias_resolves_to_inventory() {
        assert_eq!(
            normalize_report_type("iso-inventory"),
            Some(INVENTORY_OF_ASSETS)
        );
        assert_eq!(normalize_report_type(RISK_ASSESSMENT), Some(RISK_ASSESSMENT));
        assert_eq!(normalize_report_type("asset-heatmap"), None);
        assert!(!is_known_report_type(""));
    }

    #[test]
    fn listing_omits_aliases() {
        let value = catalog_json_value();
        let reports = value.as_object().expect("catalog object");
        assert_eq!(reports.len(), 3);
        assert!(reports.contains_key(INVENTORY_OF_ASSETS));
        assert!(!reports.contains_key("iso-inventory"));
    }

    #[test]
    fn listing_carries_scope_targets_and_pdf_output() {
        let value = catalog_json_value();
        let soa = &value[STATEMENT_OF_APPLICABILITY];
        assert_eq!(soa["multipleTargetsSupported"], Value::Bool(false));
        assert_eq!(soa["outputTypes"][0], "application/pdf");
        assert_eq!(soa["targetTypes"][0]["modelType"], "scope");
        assert!(soa["targetTypes"][0]["subTypes"].is_null());
        assert_eq!(soa["name"]["de"], "Anwendbarkeitserklärung");
    }

    #[test]
    fn localized_names_fall_back_to_english() {
        let def = report_def("iso-inventory").expect("alias lookup");
        assert_eq!(def.name.get("de"), "Bestandsverzeichnis der Assets");
        assert_eq!(def.name.get("fr"), "Inventory of Assets");
    }

    #[test]
    fn attachment_filenames_use_canonical_ids() {
        assert_eq!(
            attachment_filename("iso-inventory"),
            "inventory-of-assets-report.pdf"
        );
        assert_eq!(attachment_filename("gap analysis"), "gap_analysis-report.pdf");
        assert_eq!(attachment_filename(""), "report-report.pdf");
    }
}
