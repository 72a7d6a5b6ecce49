//! Layer tables: which feature tables to draw, in which order, with which
//! styling hooks.
//!
//! A [`LayerSpec`] names one drawing pass over one feature table, optionally
//! restricted to a single classification code. Passes are ordered: water
//! under contours under roads under point symbols. A table may appear in
//! several passes with different codes (road classes, mire types), and a
//! pass may emit more than one element per feature (`elem_count`) so a
//! stylesheet can draw casing and centerline from the same geometry.
//!
//! Two map variants are built in; a custom table can be loaded from JSON
//! with [`from_json_file`].

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// One drawing pass over a feature table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LayerSpec {
    /// Feature table name, validated against the database schema before use.
    pub table: String,
    /// Elements emitted per feature; each gets a class suffixed `_0`, `_1`…
    #[serde(default = "default_elem_count")]
    pub elem_count: u32,
    /// Restrict the pass to rows with this classification code.
    #[serde(default)]
    pub class_code: Option<i64>,
    /// CSS class stem; defaults to the table name.
    #[serde(default)]
    pub alias: Option<String>,
    /// Id of the `<defs>` symbol referenced by `<use href="#…">` for point
    /// features.
    #[serde(default)]
    pub use_href: Option<String>,
}

fn default_elem_count() -> u32 {
    1
}

impl LayerSpec {
    fn table(table: &str, elem_count: u32) -> Self {
        LayerSpec {
            table: table.to_string(),
            elem_count,
            class_code: None,
            alias: None,
            use_href: None,
        }
    }

    fn class(table: &str, elem_count: u32, class_code: i64, alias: &str) -> Self {
        LayerSpec {
            class_code: Some(class_code),
            alias: Some(alias.to_string()),
            ..LayerSpec::table(table, elem_count)
        }
    }

    fn symbol(table: &str, use_href: &str) -> Self {
        LayerSpec {
            use_href: Some(use_href.to_string()),
            ..LayerSpec::table(table, 1)
        }
    }

    fn class_symbol(table: &str, class_code: i64, alias: &str, use_href: &str) -> Self {
        LayerSpec {
            use_href: Some(use_href.to_string()),
            ..LayerSpec::class(table, 1, class_code, alias)
        }
    }

    /// CSS class stem for this pass.
    pub fn alias(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.table)
    }
}

/// Drawing passes for the topographic map variant, bottom to top.
pub fn topographic() -> Vec<LayerSpec> {
    vec![
        LayerSpec::table("meri", 1),
        LayerSpec::table("jarvi", 1),
        LayerSpec::table("virtavesialue", 1),
        LayerSpec::table("virtavesikapea", 1),
        LayerSpec::table("kallioalue", 1),
        LayerSpec::table("korkeuskayra", 1),
        LayerSpec::table("rakennus", 1),
        LayerSpec::class("suo", 1, 35411, "suo_helppo_avoin"),
        LayerSpec::class("suo", 1, 35412, "suo_helppo_metsa"),
        LayerSpec::class("suo", 1, 35421, "suo_vaikea_avoin"),
        LayerSpec::class("suo", 1, 35422, "suo_vaikea_metsa"),
        LayerSpec::table("soistuma", 1),
        LayerSpec::table("jyrkanne", 1),
        LayerSpec::table("kalliohalkeama", 1),
        LayerSpec::class("tieviiva", 1, 12316, "ajopolku"),
        LayerSpec::class("tieviiva", 1, 12314, "kavelyjapyoratie"),
        LayerSpec::class("tieviiva", 1, 12313, "polku"),
        LayerSpec::class("tieviiva", 1, 12312, "talvitie"),
        LayerSpec::class("tieviiva", 1, 12141, "ajotie"),
        LayerSpec::class("tieviiva", 2, 12132, "autotie_IIIb"),
        LayerSpec::class("tieviiva", 2, 12131, "autotie_IIIa"),
        LayerSpec::class("tieviiva", 2, 12122, "autotie_IIb"),
        LayerSpec::class("tieviiva", 2, 12121, "autotie_IIa"),
        LayerSpec::class("tieviiva", 2, 12112, "autotie_Ib"),
        LayerSpec::class("tieviiva", 2, 12111, "autotie_Ia"),
        LayerSpec::table("rautatie", 2),
        LayerSpec::table("aita", 2),
        LayerSpec::symbol("kivi", "p_kivi"),
        LayerSpec::symbol("lahde", "p_lahde"),
        LayerSpec::class_symbol("metsamaankasvillisuus", 32710, "havupuu", "p_havupuu"),
        LayerSpec::class_symbol("metsamaankasvillisuus", 32714, "sekapuu", "p_sekapuu"),
        LayerSpec::class_symbol("metsamaankasvillisuus", 32713, "lehtipuu", "p_lehtipuu"),
        LayerSpec::class_symbol("metsamaankasvillisuus", 32719, "pensaikko", "p_pensaikko"),
        LayerSpec::table("sahkolinja", 1),
        LayerSpec::table("luonnonsuojelualue", 1),
        LayerSpec::table("kansallispuisto", 1),
        LayerSpec::table("puisto", 1),
        LayerSpec::table("maatalousmaa", 1),
    ]
}

/// Drawing passes for the small-scale overview variant.
pub fn overview() -> Vec<LayerSpec> {
    vec![
        LayerSpec::table("kunnanhallintoraja", 1),
        LayerSpec::table("meri", 1),
        LayerSpec::table("rautatie", 1),
    ]
}

/// Loads a custom layer table from a JSON array of specs.
pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Vec<LayerSpec>> {
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("reading layer table {}", path.as_ref().display()))?;
    let specs: Vec<LayerSpec> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing layer table {}", path.as_ref().display()))?;
    Ok(specs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_defaults_to_table_name() {
        let spec = LayerSpec::table("meri", 1);
        assert_eq!(spec.alias(), "meri");
        let spec = LayerSpec::class("suo", 1, 35411, "suo_helppo_avoin");
        assert_eq!(spec.alias(), "suo_helppo_avoin");
    }

    #[test]
    fn test_topographic_road_passes() {
        let layers = topographic();
        let roads: Vec<&LayerSpec> = layers.iter().filter(|l| l.table == "tieviiva").collect();
        assert_eq!(roads.len(), 11);
        // Major road classes are drawn twice (casing plus centerline).
        let major = roads.iter().find(|l| l.class_code == Some(12111)).unwrap();
        assert_eq!(major.elem_count, 2);
        assert_eq!(major.alias(), "autotie_Ia");
    }

    #[test]
    fn test_symbol_layers() {
        let layers = topographic();
        let kivi = layers.iter().find(|l| l.table == "kivi").unwrap();
        assert_eq!(kivi.use_href.as_deref(), Some("p_kivi"));
        assert_eq!(kivi.alias(), "kivi");
    }

    #[test]
    fn test_json_layer_table() {
        let json = r#"[
            {"table": "meri"},
            {"table": "suo", "class_code": 35411, "alias": "suo_helppo_avoin"},
            {"table": "kivi", "use_href": "p_kivi", "elem_count": 2}
        ]"#;
        let specs: Vec<LayerSpec> = serde_json::from_str(json).unwrap();
        assert_eq!(specs[0], LayerSpec::table("meri", 1));
        assert_eq!(specs[1].class_code, Some(35411));
        assert_eq!(specs[2].elem_count, 2);
        assert_eq!(specs[2].use_href.as_deref(), Some("p_kivi"));
    }
}
