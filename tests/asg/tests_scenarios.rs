//! End-to-end pipeline scenarios.

use cobol_asg::asg::{DataDescriptionEntryData, ExecData};
use cobol_asg::{NodeData, NodeKind, Operand, RefTarget, StatementData};

use crate::helpers::{build, build_with_copy_dir, tandem};

#[test]
fn hello_program() {
    let program = build(
        "IDENTIFICATION DIVISION. PROGRAM-ID. HELLO. PROCEDURE DIVISION. DISPLAY \"HI\".",
    );

    assert_eq!(program.units().len(), 1);
    let unit = program.units()[0];
    match program.node(unit).data() {
        NodeData::CompilationUnit(data) => assert_eq!(data.name, "Hello"),
        other => panic!("expected a compilation unit, got {other:?}"),
    }

    let program_unit = program
        .child_of_kind(unit, NodeKind::ProgramUnit)
        .expect("program unit");
    assert!(
        program
            .child_of_kind(program_unit, NodeKind::IdentificationDivision)
            .is_some()
    );
    let procedure = program
        .child_of_kind(program_unit, NodeKind::ProcedureDivision)
        .expect("procedure division");

    let displays: Vec<_> = program
        .descendants(procedure)
        .into_iter()
        .filter_map(|id| match program.node(id).data() {
            NodeData::Statement(StatementData::Display(data)) => Some(data.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(displays.len(), 1);
    assert_eq!(displays[0].operands.len(), 1);
    assert_eq!(displays[0].operands[0].as_literal(), Some("\"HI\""));
}

#[test]
fn copy_with_replacing_feeds_the_data_division() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("PART.cpy"),
        tandem("01 :TAG:-REC. 05 :TAG:-NAME PIC X(20)."),
    )
    .unwrap();

    let program = build_with_copy_dir(
        "IDENTIFICATION DIVISION.\nPROGRAM-ID. CPY.\nDATA DIVISION.\nWORKING-STORAGE SECTION.\nCOPY PART REPLACING ==:TAG:== BY CUST.",
        dir.path(),
    );
    assert!(program.text().contains("01 CUST-REC. 05 CUST-NAME PIC X(20)."));

    let entries: Vec<String> = program
        .descendants(program.units()[0])
        .into_iter()
        .filter_map(|id| match program.node(id).data() {
            NodeData::DataDescriptionEntry(DataDescriptionEntryData {
                name: Some(name), ..
            }) => Some(name.to_string()),
            _ => None,
        })
        .collect();
    assert_eq!(entries, ["CUST-REC", "CUST-NAME"]);
}

#[test]
fn exec_sql_preserves_embedded_text() {
    let program = build(
        "IDENTIFICATION DIVISION.\nPROGRAM-ID. SQLX.\nPROCEDURE DIVISION.\n    EXEC SQL SELECT 1 FROM DUAL END-EXEC.",
    );
    let exec: Vec<ExecData> = program
        .descendants(program.units()[0])
        .into_iter()
        .filter_map(|id| match program.node(id).data() {
            NodeData::Statement(StatementData::Exec(data)) => Some(data.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(exec.len(), 1);
    assert_eq!(exec[0].language, "SQL");
    assert_eq!(exec[0].payload, "SELECT 1 FROM DUAL");
}

#[test]
fn qualified_references_resolve_to_distinct_records() {
    let program = build(
        "IDENTIFICATION DIVISION.\nPROGRAM-ID. QUAL.\nDATA DIVISION.\nWORKING-STORAGE SECTION.\n01 CUSTOMER.\n   05 AMOUNT PIC 9(5).\n01 ORDER.\n   05 AMOUNT PIC 9(5).\nPROCEDURE DIVISION.\n    MOVE AMOUNT OF CUSTOMER TO AMOUNT OF ORDER.",
    );

    let unit = program.units()[0];
    let move_data = program
        .descendants(unit)
        .into_iter()
        .find_map(|id| match program.node(id).data() {
            NodeData::Statement(StatementData::Move(data)) => Some(data.clone()),
            _ => None,
        })
        .expect("move statement");

    let source = move_data.source.as_ref().and_then(Operand::as_ref).unwrap();
    let RefTarget::Resolved(source_id) = source.target.clone() else {
        panic!("source unresolved: {source:?}");
    };
    let RefTarget::Resolved(target_id) = move_data.targets[0].target.clone() else {
        panic!("target unresolved");
    };
    assert_ne!(source_id, target_id);

    // Each resolves under its own record.
    let record_of = |mut id: cobol_asg::NodeId| loop {
        let node = program.node(id);
        match node.data() {
            NodeData::DataDescriptionEntry(data) if data.level == 1 => {
                break data.name.clone().unwrap();
            }
            _ => id = node.parent().unwrap(),
        }
    };
    assert_eq!(record_of(source_id), "CUSTOMER");
    assert_eq!(record_of(target_id), "ORDER");
    assert!(program.diagnostics().is_empty(), "{:?}", program.diagnostics());
}

#[test]
fn nested_programs_build_nested_units() {
    let program = build(
        "IDENTIFICATION DIVISION.\nPROGRAM-ID. OUTER.\nPROCEDURE DIVISION.\n    DISPLAY \"O\".\nIDENTIFICATION DIVISION.\nPROGRAM-ID. INNER.\nPROCEDURE DIVISION.\n    DISPLAY \"I\".\nEND PROGRAM INNER.\nEND PROGRAM OUTER.",
    );
    assert_eq!(program.units().len(), 2);
    let outer = program.unit_by_name("OUTER").unwrap();
    let inner = program.unit_by_name("INNER").unwrap();

    // INNER hangs below OUTER in the ownership tree.
    let mut current = program.node(inner).parent();
    let mut found = false;
    while let Some(id) = current {
        if id == outer {
            found = true;
            break;
        }
        current = program.node(id).parent();
    }
    assert!(found, "INNER should be owned by OUTER");
}

#[test]
fn preprocessed_text_is_retrievable_from_the_program() {
    let program = build(
        "IDENTIFICATION DIVISION.\nPROGRAM-ID. KEEP.\nPROCEDURE DIVISION.\n    DISPLAY \"K\".",
    );
    assert!(program.text().contains("PROGRAM-ID. KEEP."));
}
