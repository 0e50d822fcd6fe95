//! Name resolution and semantic diagnostics.

use cobol_asg::{Diagnostic, NodeData, RefTarget, StatementData};

use crate::helpers::build;

#[test]
fn unresolved_names_become_placeholders_not_errors() {
    let program = build(
        "IDENTIFICATION DIVISION.\nPROGRAM-ID. MISS.\nPROCEDURE DIVISION.\n    MOVE GHOST TO PHANTOM.",
    );
    let move_data = program
        .descendants(program.units()[0])
        .into_iter()
        .find_map(|id| match program.node(id).data() {
            NodeData::Statement(StatementData::Move(data)) => Some(data.clone()),
            _ => None,
        })
        .expect("move statement");

    let source = move_data.source.unwrap();
    let source = source.as_ref().unwrap();
    assert_eq!(source.name, "GHOST");
    assert!(matches!(
        &source.target,
        RefTarget::Unresolved { candidates } if candidates.is_empty()
    ));

    let unresolved: Vec<_> = program
        .diagnostics()
        .iter()
        .filter(|diagnostic| matches!(diagnostic, Diagnostic::UnresolvedReference { .. }))
        .collect();
    assert_eq!(unresolved.len(), 2);
}

#[test]
fn ambiguous_names_keep_all_candidates() {
    let program = build(
        "IDENTIFICATION DIVISION.\nPROGRAM-ID. AMBIG.\nDATA DIVISION.\nWORKING-STORAGE SECTION.\n01 REC-A.\n   05 AMOUNT PIC 9.\n01 REC-B.\n   05 AMOUNT PIC 9.\nPROCEDURE DIVISION.\n    MOVE AMOUNT TO AMOUNT.",
    );
    let move_data = program
        .descendants(program.units()[0])
        .into_iter()
        .find_map(|id| match program.node(id).data() {
            NodeData::Statement(StatementData::Move(data)) => Some(data.clone()),
            _ => None,
        })
        .expect("move statement");

    let source = move_data.source.unwrap();
    let source = source.as_ref().unwrap();
    match &source.target {
        RefTarget::Unresolved { candidates } => assert_eq!(candidates.len(), 2),
        other => panic!("expected a placeholder, got {other:?}"),
    }
    assert!(
        program
            .diagnostics()
            .iter()
            .any(|diagnostic| matches!(diagnostic, Diagnostic::AmbiguousReference { .. }))
    );
}

#[test]
fn perform_targets_resolve_to_paragraphs() {
    let program = build(
        "IDENTIFICATION DIVISION.\nPROGRAM-ID. PERF.\nPROCEDURE DIVISION.\nMAIN-PARA.\n    PERFORM INIT-PARA THRU EXIT-PARA.\n    STOP RUN.\nINIT-PARA.\n    CONTINUE.\nEXIT-PARA.\n    CONTINUE.",
    );
    let perform = program
        .descendants(program.units()[0])
        .into_iter()
        .find_map(|id| match program.node(id).data() {
            NodeData::Statement(StatementData::Perform(data)) => Some(data.clone()),
            _ => None,
        })
        .expect("perform statement");

    let range = perform.target.expect("procedure range");
    let RefTarget::Resolved(from) = range.from.target.clone() else {
        panic!("THRU start unresolved: {:?}", range.from);
    };
    let RefTarget::Resolved(thru) = range.thru.expect("THRU end").target else {
        panic!("THRU end unresolved");
    };
    assert_eq!(program.node(from).name().map(|n| n.as_str()), Some("INIT-PARA"));
    assert_eq!(program.node(thru).name().map(|n| n.as_str()), Some("EXIT-PARA"));
}

#[test]
fn go_to_resolves_within_the_current_section_first() {
    let program = build(
        "IDENTIFICATION DIVISION.\nPROGRAM-ID. SECTS.\nPROCEDURE DIVISION.\nFIRST-PART SECTION.\nSTART-UP.\n    GO TO FINISH.\nFINISH.\n    CONTINUE.\nSECOND-PART SECTION.\nFINISH.\n    CONTINUE.",
    );
    let go_to = program
        .descendants(program.units()[0])
        .into_iter()
        .find_map(|id| match program.node(id).data() {
            NodeData::Statement(StatementData::GoTo(data)) => Some(data.clone()),
            _ => None,
        })
        .expect("go to statement");

    let RefTarget::Resolved(target) = go_to.targets[0].target.clone() else {
        panic!("GO TO target unresolved");
    };
    // Two paragraphs are named FINISH; the one in FIRST-PART wins.
    let mut current = program.node(target).parent();
    let mut section_name = None;
    while let Some(id) = current {
        if let NodeData::ProcedureSection(data) = program.node(id).data() {
            section_name = Some(data.name.clone());
            break;
        }
        current = program.node(id).parent();
    }
    assert_eq!(section_name.as_deref(), Some("FIRST-PART"));
}

#[test]
fn global_items_are_visible_to_nested_programs() {
    let program = build(
        "IDENTIFICATION DIVISION.\nPROGRAM-ID. OUTER.\nDATA DIVISION.\nWORKING-STORAGE SECTION.\n01 SHARED-FLAG GLOBAL PIC X.\nPROCEDURE DIVISION.\n    CONTINUE.\nIDENTIFICATION DIVISION.\nPROGRAM-ID. INNER.\nPROCEDURE DIVISION.\n    DISPLAY SHARED-FLAG.\nEND PROGRAM INNER.\nEND PROGRAM OUTER.",
    );
    let inner = program.unit_by_name("INNER").unwrap();
    let display = program
        .descendants(inner)
        .into_iter()
        .find_map(|id| match program.node(id).data() {
            NodeData::Statement(StatementData::Display(data)) => Some(data.clone()),
            _ => None,
        })
        .expect("display statement");

    let operand = display.operands[0].as_ref().expect("data reference");
    let RefTarget::Resolved(target) = operand.target.clone() else {
        panic!("GLOBAL item did not resolve: {operand:?}");
    };
    // The resolved entry lives in OUTER.
    let outer = program.unit_by_name("OUTER").unwrap();
    let mut current = program.node(target).parent();
    let mut owner_unit = None;
    while let Some(id) = current {
        if program.units().contains(&id) {
            owner_unit = Some(id);
            break;
        }
        current = program.node(id).parent();
    }
    assert_eq!(owner_unit, Some(outer));
}

#[test]
fn non_global_items_stay_invisible_to_nested_programs() {
    let program = build(
        "IDENTIFICATION DIVISION.\nPROGRAM-ID. OUTER.\nDATA DIVISION.\nWORKING-STORAGE SECTION.\n01 PRIVATE-FLAG PIC X.\nPROCEDURE DIVISION.\n    CONTINUE.\nIDENTIFICATION DIVISION.\nPROGRAM-ID. INNER.\nPROCEDURE DIVISION.\n    DISPLAY PRIVATE-FLAG.\nEND PROGRAM INNER.\nEND PROGRAM OUTER.",
    );
    let inner = program.unit_by_name("INNER").unwrap();
    let display = program
        .descendants(inner)
        .into_iter()
        .find_map(|id| match program.node(id).data() {
            NodeData::Statement(StatementData::Display(data)) => Some(data.clone()),
            _ => None,
        })
        .expect("display statement");
    let operand = display.operands[0].as_ref().expect("data reference");
    assert!(!operand.target.is_resolved());
}

#[test]
fn duplicate_definitions_are_reported_but_not_fatal() {
    let program = build(
        "IDENTIFICATION DIVISION.\nPROGRAM-ID. DUPS.\nDATA DIVISION.\nWORKING-STORAGE SECTION.\n01 TWIN PIC X.\n01 TWIN PIC X.",
    );
    assert!(
        program
            .diagnostics()
            .iter()
            .any(|diagnostic| matches!(diagnostic, Diagnostic::DuplicateDefinition { .. }))
    );
}

#[test]
fn mnemonics_resolve_from_special_names() {
    let program = build(
        "IDENTIFICATION DIVISION.\nPROGRAM-ID. MNEM.\nENVIRONMENT DIVISION.\nCONFIGURATION SECTION.\nSPECIAL-NAMES.\n    SYSOUT IS REPORT-LOG.\nPROCEDURE DIVISION.\n    DISPLAY \"X\" UPON REPORT-LOG.",
    );
    let display = program
        .descendants(program.units()[0])
        .into_iter()
        .find_map(|id| match program.node(id).data() {
            NodeData::Statement(StatementData::Display(data)) => Some(data.clone()),
            _ => None,
        })
        .expect("display statement");
    let upon = display.upon.expect("UPON reference");
    assert!(upon.target.is_resolved(), "{upon:?}");
    assert!(program.diagnostics().is_empty(), "{:?}", program.diagnostics());
}
