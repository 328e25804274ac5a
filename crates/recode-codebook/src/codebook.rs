//! Codebook for a single version of a protocol.
//!
//! The source column name is carried as a `property` named `PALGA_COLNAME`
//! on a concept element; it is the link between the registry export and
//! the terminology. The concept's `id` links it to a sibling
//! `terminologyAssociation`, which recodes the column name itself to a
//! code or display name. Concepts may carry a `valueSet/conceptList`
//! whose entries translate the raw export values; each entry's raw-value
//! key is the designation marked `preferred`.
//!
//! In short:
//! - concept translation: column name -> terminology association code / display name
//! - value translation: preferred designation -> value-set entry code / display name

use std::collections::{BTreeMap, HashMap};

use recode_model::{Concept, OutputFormat, Terminology, ValueEntry};

use crate::dedupe::WarnDedupe;
use crate::xml::Element;

const COLUMN_NAME_PROPERTY: &str = "PALGA_COLNAME";

/// Concept dictionary for one (protocol, version, language), immutable
/// after construction. Column-name lookup is case-insensitive.
#[derive(Debug, Clone)]
pub struct Codebook {
    version: String,
    by_column: BTreeMap<String, Concept>,
}

impl Codebook {
    /// An empty codebook; concepts are added with [`Codebook::insert`].
    /// Mainly useful for tests that inject hand-built codebooks.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            by_column: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, concept: Concept) {
        self.by_column
            .insert(concept.column_name().to_lowercase(), concept);
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.by_column.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_column.is_empty()
    }

    /// Build a codebook from a parsed terminology document.
    pub fn build(root: &Element, version: impl Into<String>) -> Self {
        let mut builder = Builder::default();
        builder.walk(root);
        let mut codebook = Self::new(version);
        for (key, concept) in builder.concepts {
            codebook.by_column.insert(key, concept);
        }
        codebook
    }

    /// Whether the codebook knows this column name. A miss is warned
    /// once per codebook, since concept and values will pass through
    /// untranslated.
    pub fn contains_header(&self, name: &str, warnings: &WarnDedupe) -> bool {
        if self.by_column.contains_key(&name.to_lowercase()) {
            return true;
        }
        warnings.warn_once(&format!(
            "The headername {name} does not exist in the codebook (version {}). \
             Concept and values for this concept will not be translated.",
            self.version
        ));
        false
    }

    /// Like [`Codebook::contains_header`] but silent; used where a miss
    /// is an expected outcome rather than a translation gap.
    pub fn knows_header(&self, name: &str) -> bool {
        self.by_column.contains_key(&name.to_lowercase())
    }

    /// Translate a value of the named concept, falling back to the
    /// untranslated value on any failure.
    pub fn translate_concept_value(
        &self,
        format: OutputFormat,
        value: &str,
        name: &str,
        warnings: &WarnDedupe,
    ) -> String {
        let Some(concept) = self.by_column.get(&name.to_lowercase()) else {
            warnings.warn_once(&format!(
                "Headername {name} doesn't exist. Codebook version {}. Value will not be translated.",
                self.version
            ));
            return value.to_string();
        };
        match concept.translate_value(value, format) {
            Ok(translated) => translated,
            Err(error) => {
                warnings.warn_once(&format!(
                    "{error}. Codebook version {}. Value will not be translated.",
                    self.version
                ));
                value.to_string()
            }
        }
    }

    /// Translate the named concept itself, falling back to the
    /// untranslated name on any failure.
    pub fn translate_concept(
        &self,
        format: OutputFormat,
        name: &str,
        warnings: &WarnDedupe,
    ) -> String {
        let Some(concept) = self.by_column.get(&name.to_lowercase()) else {
            warnings.warn_once(&format!(
                "Headername {name} doesn't exist. Codebook version {}. \
                 Headername will not be translated.",
                self.version
            ));
            return name.to_string();
        };
        match concept.translate_header(format) {
            Ok(translated) => translated,
            Err(error) => {
                warnings.warn_once(&format!(
                    "{error}. Codebook version {}. Headername will not be translated.",
                    self.version
                ));
                name.to_string()
            }
        }
    }
}

#[derive(Default)]
struct Builder {
    // column-name key (lowercased) -> concept
    concepts: Vec<(String, Concept)>,
    // terminology id -> index into `concepts`
    by_id: HashMap<String, usize>,
}

impl Builder {
    /// Depth-first walk over `concept` children. Groups recurse; any
    /// node with status draft or final and a recognized column-name
    /// property becomes a concept. Other statuses are silently skipped.
    fn walk(&mut self, element: &Element) {
        for concept_element in element.children_named("concept") {
            if concept_element.attr("type").eq_ignore_ascii_case("group") {
                self.walk(concept_element);
            }
            if has_valid_status(concept_element) {
                self.handle_concept(concept_element);
            }
        }
    }

    fn handle_concept(&mut self, concept_element: &Element) {
        let Some(column_name) = column_name_property(concept_element) else {
            return;
        };
        let mut concept = Concept::new(concept_element.attr("id"), &column_name);
        add_value_set(&mut concept, concept_element);

        let index = self.concepts.len();
        self.by_id.insert(concept.id().to_string(), index);
        self.concepts.push((column_name.to_lowercase(), concept));

        self.attach_terminology(concept_element);
    }

    /// Attach `terminologyAssociation` children to already-registered
    /// concepts, matched by concept id.
    fn attach_terminology(&mut self, element: &Element) {
        for association in element.children_named("terminologyAssociation") {
            let concept_id = association.attr("conceptId");
            if let Some(&index) = self.by_id.get(concept_id) {
                self.concepts[index].1.set_terminology(Terminology {
                    code: association.attr("code").to_string(),
                    code_system: association.attr("codeSystemName").to_string(),
                    display_name: association.attr("displayName").to_string(),
                });
            }
        }
    }
}

fn has_valid_status(element: &Element) -> bool {
    let status = element.attr("statusCode");
    status.eq_ignore_ascii_case("draft") || status.eq_ignore_ascii_case("final")
}

fn column_name_property(concept_element: &Element) -> Option<String> {
    for property in concept_element.children_named("property") {
        if property.attr("name").eq_ignore_ascii_case(COLUMN_NAME_PROPERTY) {
            let name = property.text.trim();
            if !name.is_empty() {
                return Some(name.to_string());
            }
        }
    }
    None
}

fn add_value_set(concept: &mut Concept, concept_element: &Element) {
    let Some(value_set) = concept_element.first_child_named("valueSet") else {
        return;
    };
    let Some(concept_list) = value_set.first_child_named("conceptList") else {
        return;
    };
    // entries live in concept tags, null flavors in exception tags
    for tag in ["concept", "exception"] {
        for entry in concept_list.children_named(tag) {
            concept.insert_value(
                preferred_designation(entry),
                ValueEntry {
                    code: entry.attr("code").to_string(),
                    code_system: entry.attr("codeSystemName").to_string(),
                    display_name: entry.attr("displayName").to_string(),
                },
            );
        }
    }
}

/// The raw value as it appears in registry exports: the display name of
/// the designation typed `preferred`. With multiple preferred
/// designations the last one wins.
fn preferred_designation(entry: &Element) -> String {
    let mut raw_value = String::new();
    for designation in entry.children_named("designation") {
        if designation.attr("type").eq_ignore_ascii_case("preferred") {
            raw_value = designation.attr("displayName").to_string();
        }
    }
    raw_value
}
