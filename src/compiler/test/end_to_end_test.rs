use crate::compiler::backend::GeneratorConfig;
use crate::compiler::{BatchSummary, CompileError, Compiler, OutputTarget, PatternCGenerator, PestPatternParser};
use pretty_assertions::assert_eq;
use std::fs;

type PatternCompiler = Compiler<PestPatternParser, PatternCGenerator>;

const ADD_ZERO: &str = "
set load = { iload, aload };

/* x + 0 == x */
pattern simplify_add_zero:
    x: load(a)
    ldc_int(k)
    iadd
-->
{
    if (k == 0) { x; }
}
";

fn bare_compiler() -> PatternCompiler {
    PatternCompiler::default().set_config(GeneratorConfig::default().with_preamble(""))
}

#[test]
fn compile_str_full_output() {
    let generated = bare_compiler().compile_str(ADD_ZERO, "arith").unwrap();

    let expected = "int simplify_add_zero_iload(CODE **c)
{
    CODE *instr_x = *c;
    int arg_a;
    if (!is_iload(instr_x, &arg_a)) return 0;
    CODE *instr_2 = next(instr_x);
    int arg_k;
    if (!is_ldc_int(instr_2, &arg_k)) return 0;
    CODE *instr_3 = next(instr_2);
    if (!is_iadd(instr_3)) return 0;
    if ((arg_k == 0)) {
        CODE *statement_1 = copyCODE(instr_x);
        statement_1->next = next(instr_3);
        return replace(c, 3, statement_1);
    } else {
        return 0;
    }
}

int simplify_add_zero_aload(CODE **c)
{
    CODE *instr_x = *c;
    int arg_a;
    if (!is_aload(instr_x, &arg_a)) return 0;
    CODE *instr_2 = next(instr_x);
    int arg_k;
    if (!is_ldc_int(instr_2, &arg_k)) return 0;
    CODE *instr_3 = next(instr_2);
    if (!is_iadd(instr_3)) return 0;
    if ((arg_k == 0)) {
        CODE *statement_1 = copyCODE(instr_x);
        statement_1->next = next(instr_3);
        return replace(c, 3, statement_1);
    } else {
        return 0;
    }
}

int init_patterns_arith(void)
{
    ADD_PATTERN(simplify_add_zero_iload);
    ADD_PATTERN(simplify_add_zero_aload);
    return 1;
}
";
    assert_eq!(expected, generated.code);
    assert_eq!(expected, generated.to_string());
}

#[test]
fn compile_str_static_switch_over_stores() {
    let source = "
        set load = { iload, aload };
        pattern load_store_same:
            x: load(a)
            { istore, astore }(b)
        -->
        {
            x;
            switch (x) {
                case iload: { istore(b); }
                case aload: { astore(b); }
            }
        }
    ";
    let generated = bare_compiler().compile_str(source, "stores").unwrap();

    assert_eq!(vec![
        "load_store_same_iload_istore",
        "load_store_same_iload_astore",
        "load_store_same_aload_istore",
        "load_store_same_aload_astore",
    ], generated.function_names);
    assert!(!generated.code.contains("switch"));
    assert_eq!(2, generated.code.matches("makeCODEistore(arg_b, NULL)").count());
    assert_eq!(2, generated.code.matches("makeCODEastore(arg_b, NULL)").count());
}

#[test]
fn compile_str_reports_parse_errors() {
    let error = bare_compiler().compile_str("pattern broken: --> { }", "broken").unwrap_err();
    assert!(matches!(error, CompileError::Parse { .. }));
    assert!(error.is_data_error());
    assert!(error.to_string().starts_with("broken: Syntax Error"));
}

#[test]
fn compile_str_unresolved_case_aborts_file() {
    let source = "
        set int_oper = { iadd, isub };
        pattern first: nop --> { }
        pattern fold: x: int_oper --> { switch (x) { case iadd: { x; } } }
    ";
    let error = bare_compiler().compile_str(source, "fold").unwrap_err();

    assert_eq!("fold: In rule 'fold' [x=isub]: Switch on 'x' has no case for bound instruction 'isub'",
               error.to_string());
}

#[test]
fn compile_and_save_writes_output() {
    let directory = tempfile::tempdir().unwrap();
    let source = directory.path().join("arith.pat");
    let destination = directory.path().join("arith.c");
    fs::write(&source, ADD_ZERO).unwrap();

    let generated = PatternCompiler::default().compile_and_save(&source, &destination).unwrap();

    let written = fs::read_to_string(&destination).unwrap();
    assert_eq!(generated.code, written);
    assert!(written.starts_with(GeneratorConfig::default().preamble()));
    assert!(written.contains("int init_patterns_arith(void)"));
    assert_eq!(2, generated.function_names.len());
    assert!(!directory.path().join("arith.c.tmp").exists());
}

#[test]
fn compile_and_save_failure_leaves_no_output() {
    let directory = tempfile::tempdir().unwrap();
    let source = directory.path().join("bad.pat");
    let destination = directory.path().join("bad.c");
    fs::write(&source, "pattern bad: iload --> { ldc_int(k); }").unwrap();

    let error = bare_compiler().compile_and_save(&source, &destination).unwrap_err();

    assert!(matches!(error, CompileError::Generate { .. }));
    assert!(!destination.exists());
    assert!(!directory.path().join("bad.c.tmp").exists());
}

#[test]
fn compile_missing_file_is_io_error() {
    let directory = tempfile::tempdir().unwrap();
    let error = bare_compiler().compile(&directory.path().join("missing.pat")).unwrap_err();

    assert!(matches!(error, CompileError::Io { .. }));
    assert!(!error.is_data_error());
}

#[test]
fn file_stem_names_init_function() {
    let directory = tempfile::tempdir().unwrap();
    let source = directory.path().join("jump-folding.pat");
    fs::write(&source, "pattern nop_nop: nop nop --> { nop; }").unwrap();

    let generated = bare_compiler().compile(&source).unwrap();
    assert_eq!("init_patterns_jump_folding", generated.init_function);
}

#[test]
fn compile_batch_continues_past_failing_file() {
    let directory = tempfile::tempdir().unwrap();
    let bad = directory.path().join("bad.pat");
    let good = directory.path().join("good.pat");
    fs::write(&bad, "pattern bad: iload --> { ldc_int(k); }").unwrap();
    fs::write(&good, ADD_ZERO).unwrap();

    let summary = bare_compiler().compile_batch(&[bad, good], &OutputTarget::NextToSource);

    assert_eq!(BatchSummary { translated: 1, data_errors: 1, io_errors: 0 }, summary);
    assert_eq!(exitcode::DATAERR, summary.exit_code());
    assert!(!directory.path().join("bad.c").exists());
    assert!(fs::read_to_string(directory.path().join("good.c")).unwrap()
        .contains("int init_patterns_good(void)"));
}

#[test]
fn compile_batch_writes_into_output_directory() {
    let sources = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let source = sources.path().join("fold.pat");
    fs::write(&source, ADD_ZERO).unwrap();

    let target = OutputTarget::Directory(output.path().to_path_buf());
    let summary = bare_compiler().compile_batch(&[source.clone()], &target);

    assert_eq!(exitcode::OK, summary.exit_code());
    assert!(output.path().join("fold.c").exists());
    assert!(!sources.path().join("fold.c").exists());
    assert_eq!(None, OutputTarget::Stdout.destination(&source));
}

#[test]
fn compile_batch_exit_codes() {
    let directory = tempfile::tempdir().unwrap();
    let missing = directory.path().join("missing.pat");

    let summary = bare_compiler().compile_batch(&[missing], &OutputTarget::NextToSource);
    assert_eq!(BatchSummary { translated: 0, data_errors: 0, io_errors: 1 }, summary);
    assert_eq!(exitcode::IOERR, summary.exit_code());

    assert_eq!(exitcode::NOINPUT, bare_compiler().compile_batch(&[], &OutputTarget::Stdout).exit_code());
}
