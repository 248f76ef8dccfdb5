use super::*;

fn ok(source: &str) -> Program {
    assemble(source).unwrap_or_else(|e| panic!("unexpected assemble error: {e}"))
}

fn err(source: &str) -> AssembleError {
    assemble(source).expect_err("expected an assemble error")
}

#[test]
fn nop_only_program() {
    let program = ok("NOP\nNOP\nNOP");
    assert_eq!(program.instructions.len(), 3);
    assert!(program.labels.is_empty());
    assert!(program.instructions.iter().all(|i| *i == Instruction::Nop));
}

#[test]
fn mov_immediate_into_acc() {
    let program = ok("MOV 500 ACC");
    assert_eq!(
        program.instructions,
        vec![Instruction::Mov {
            src: Source::Immediate(Number::new(500)),
            dst: Sink::Acc,
        }]
    );
}

#[test]
fn mov_port_to_port() {
    let program = ok("MOV UP DOWN");
    assert_eq!(
        program.instructions,
        vec![Instruction::Mov {
            src: Source::Up,
            dst: Sink::Down,
        }]
    );
}

#[test]
fn labels_resolve_to_next_instruction_index() {
    let program = ok("MOV 3 ACC\nL: SUB 1\nMOV ACC DOWN\nJGZ L");
    assert_eq!(program.labels.get("L"), Some(&1));
    assert_eq!(program.instructions.len(), 3);
    assert_eq!(program.instructions[2], Instruction::Jgz("L".into()));
}

#[test]
fn label_at_end_of_program_points_past_last_instruction() {
    let program = ok("NOP\nEND:");
    assert_eq!(program.labels.get("END"), Some(&1));
}

#[test]
fn jro_accepts_an_immediate_or_a_name() {
    assert_eq!(
        ok("JRO -1").instructions,
        vec![Instruction::Jro {
            src: Source::Immediate(Number::new(-1))
        }]
    );
    assert_eq!(
        ok("JRO ACC").instructions,
        vec![Instruction::Jro { src: Source::Acc }]
    );
}

#[test]
fn missing_operand_is_an_error() {
    assert!(matches!(
        err("ADD"),
        AssembleError::Parse(ParseError::UnexpectedEndOfInput { .. })
    ));
}

#[test]
fn literal_out_of_range_is_an_error() {
    assert!(matches!(
        err("MOV 1000 ACC"),
        AssembleError::Parse(ParseError::NumberOutOfRange { .. })
    ));
}

#[test]
fn duplicate_label_is_an_error() {
    assert!(matches!(
        err("L:\nL:"),
        AssembleError::Parse(ParseError::DuplicateLabel { .. })
    ));
}

#[test]
fn lex_error_surfaces_through_assemble() {
    assert!(matches!(err("& "), AssembleError::Lex(_)));
}

#[test]
fn bare_number_where_instruction_expected_is_an_error() {
    assert!(matches!(
        err("42"),
        AssembleError::Parse(ParseError::UnexpectedNumber { .. })
    ));
}

#[test]
fn bak_is_not_a_resolvable_operand() {
    assert!(matches!(
        err("MOV BAK ACC"),
        AssembleError::Parse(ParseError::UnrecognizedOperand { .. })
    ));
}

#[test]
fn unrecognized_name_in_a_port_slot_is_an_error() {
    assert!(matches!(
        err("MOV FOO ACC"),
        AssembleError::Parse(ParseError::UnrecognizedOperand { .. })
    ));
}

#[test]
fn bak_in_jump_target_position_is_an_error_not_an_undefined_label() {
    assert!(matches!(
        err("JMP BAK"),
        AssembleError::Parse(ParseError::InvalidToken { .. })
    ));
}

#[test]
fn immediate_is_not_a_valid_destination() {
    assert!(matches!(
        err("MOV ACC 1"),
        AssembleError::Parse(ParseError::InvalidToken { .. })
    ));
}
