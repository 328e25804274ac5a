use recode_codebook::{Codebook, WarnDedupe, parse_document};
use recode_model::OutputFormat;

const TERMINOLOGY: &str = r#"
<dataset id="ds-33">
  <concept id="grp-1" type="group" statusCode="final">
    <concept id="con-1" statusCode="final">
      <property name="PALGA_COLNAME">colonbiopt</property>
      <valueSet id="vs-1">
        <conceptList>
          <concept code="C1" codeSystemName="SNOMED CT" displayName="Adenoma">
            <designation type="preferred" displayName="adenoma"/>
          </concept>
          <concept code="C2" codeSystemName="SNOMED CT" displayName="Carcinoma">
            <designation type="synonym" displayName="crc"/>
            <designation type="preferred" displayName="carcinoom"/>
          </concept>
          <exception code="NI" codeSystemName="NullFlavor" displayName="No information">
            <designation type="preferred" displayName="onbekend"/>
          </exception>
        </conceptList>
      </valueSet>
      <terminologyAssociation conceptId="con-1" code="C100" codeSystemName="SNOMED CT" displayName="Colon biopt"/>
    </concept>
    <concept id="con-2" statusCode="cancelled">
      <property name="PALGA_COLNAME">vervallen</property>
    </concept>
    <concept id="con-3" statusCode="draft">
      <property name="PALGA_COLNAME">aantalstukjes</property>
      <terminologyAssociation conceptId="con-3" code="C300" codeSystemName="SNOMED CT" displayName="Number of fragments"/>
    </concept>
  </concept>
</dataset>
"#;

fn build() -> Codebook {
    let root = parse_document(TERMINOLOGY).expect("parse terminology");
    Codebook::build(&root, "33")
}

#[test]
fn includes_draft_and_final_excludes_other_statuses() {
    let codebook = build();
    assert!(codebook.knows_header("colonbiopt"));
    assert!(codebook.knows_header("aantalstukjes"));
    assert!(!codebook.knows_header("vervallen"));
    assert_eq!(codebook.len(), 2);
}

#[test]
fn header_lookup_is_case_insensitive() {
    let codebook = build();
    let warnings = WarnDedupe::new();
    assert!(codebook.contains_header("ColonBiopt", &warnings));
    assert_eq!(warnings.distinct_count(), 0);
}

#[test]
fn translates_header_and_values() {
    let codebook = build();
    let warnings = WarnDedupe::new();
    assert_eq!(
        codebook.translate_concept(OutputFormat::Descriptions, "colonbiopt", &warnings),
        "Colon biopt"
    );
    assert_eq!(
        codebook.translate_concept_value(
            OutputFormat::Descriptions,
            "adenoma",
            "colonbiopt",
            &warnings
        ),
        "Adenoma"
    );
    assert_eq!(
        codebook.translate_concept_value(
            OutputFormat::CodesystemAndCodesAndDescriptions,
            "carcinoom",
            "colonbiopt",
            &warnings
        ),
        "SNOMED CT:C2:Carcinoma"
    );
    assert_eq!(warnings.distinct_count(), 0);
}

#[test]
fn exception_entries_become_value_set_entries() {
    let codebook = build();
    let warnings = WarnDedupe::new();
    assert_eq!(
        codebook.translate_concept_value(
            OutputFormat::Codes,
            "onbekend",
            "colonbiopt",
            &warnings
        ),
        "NI"
    );
}

#[test]
fn unknown_value_passes_through_with_one_warning() {
    let codebook = build();
    let warnings = WarnDedupe::new();
    for _ in 0..3 {
        assert_eq!(
            codebook.translate_concept_value(
                OutputFormat::Descriptions,
                "sessiel",
                "colonbiopt",
                &warnings
            ),
            "sessiel"
        );
    }
    assert_eq!(warnings.distinct_count(), 1);
}

#[test]
fn missing_header_warns_once_per_codebook() {
    let codebook = build();
    let warnings = WarnDedupe::new();
    assert!(!codebook.contains_header("nope", &warnings));
    assert!(!codebook.contains_header("nope", &warnings));
    assert_eq!(warnings.distinct_count(), 1);
}

#[test]
fn missing_terminology_keeps_header_untranslated() {
    // con-3 in a document without its terminologyAssociation
    let root = parse_document(
        r#"<dataset>
             <concept id="c1" statusCode="final">
               <property name="PALGA_COLNAME">kolom</property>
             </concept>
           </dataset>"#,
    )
    .expect("parse");
    let codebook = Codebook::build(&root, "1");
    let warnings = WarnDedupe::new();
    assert_eq!(
        codebook.translate_concept(OutputFormat::Descriptions, "kolom", &warnings),
        "kolom"
    );
    assert_eq!(warnings.distinct_count(), 1);
}

#[test]
fn duplicate_preferred_designation_last_wins() {
    let root = parse_document(
        r#"<dataset>
             <concept id="c1" statusCode="final">
               <property name="PALGA_COLNAME">kolom</property>
               <valueSet>
                 <conceptList>
                   <concept code="C1" codeSystemName="SNOMED CT" displayName="One">
                     <designation type="preferred" displayName="eerste"/>
                     <designation type="preferred" displayName="tweede"/>
                   </concept>
                 </conceptList>
               </valueSet>
             </concept>
           </dataset>"#,
    )
    .expect("parse");
    let codebook = Codebook::build(&root, "1");
    let warnings = WarnDedupe::new();
    // "tweede" is the key, "eerste" is unknown
    assert_eq!(
        codebook.translate_concept_value(OutputFormat::Codes, "tweede", "kolom", &warnings),
        "C1"
    );
    assert_eq!(
        codebook.translate_concept_value(OutputFormat::Codes, "eerste", "kolom", &warnings),
        "eerste"
    );
}
