//! Position-driven code generator (§4.3).
//!
//! Walks `0..ctx.last_position` once; for each index it emits whatever IR
//! events are keyed to that position, in the fixed order loop markers →
//! calls → moves → width switches → BF instructions → returns → label
//! boundaries. `%rsi` is never cached across syscalls (its value is an
//! address, not a tracked constant) — the one exception to the register
//! sync peephole (§8 "Register-sync peephole property").

use std::io::Write;

use bfppc_lex::Keyword;
use bfppc_par::{BfInstruction, BfOpType, Label, ParsedContext, Width};
use bfppc_util::Diagnostics;

use crate::error::Result;
use crate::options::CodegenOptions;
use crate::registers::Registers;

const SYS_WRITE: i64 = 1;
const STDOUT_FD: i64 = 1;

struct Generator<'a> {
    ctx: &'a ParsedContext,
    options: CodegenOptions,
    regs: Registers,
    width: Width,
    diagnostics: &'a mut Diagnostics,
}

/// Maps a label's declared return-type keyword to the width its `!` return
/// value is moved at. Unlike the reference — which reuses the generator's
/// running cell width (`currentWidth`) for this mov, regardless of what the
/// label actually declared — the return value's width should track the
/// declared type (§8 scenario 5: `i32` returns move at `l`, not whatever
/// the cell width happened to be).
fn return_width(kw: Keyword) -> Width {
    match kw {
        Keyword::I16 | Keyword::U16 => Width::Word,
        Keyword::I32 | Keyword::U32 => Width::Dword,
        Keyword::I64 | Keyword::U64 => Width::Qword,
        _ => Width::Byte,
    }
}

fn operator_char(ty: BfOpType) -> char {
    match ty {
        BfOpType::Left => '<',
        BfOpType::Right => '>',
        BfOpType::Plus => '+',
        BfOpType::Minus => '-',
        BfOpType::Output => '.',
        BfOpType::Argument => '*',
        BfOpType::GetArg => '&',
        BfOpType::Loop | BfOpType::None => ' ',
    }
}

impl<'a> Generator<'a> {
    fn new(ctx: &'a ParsedContext, options: CodegenOptions, diagnostics: &'a mut Diagnostics) -> Self {
        Self {
            ctx,
            options,
            regs: Registers::new(),
            width: Width::Byte,
            diagnostics,
        }
    }

    fn header(&self, out: &mut impl Write) -> Result<()> {
        writeln!(out, "\t.text")?;
        for lbl in &self.ctx.labels {
            writeln!(out, "\t.globl {}", lbl.name)?;
        }
        for ext in &self.ctx.externs {
            writeln!(out, "\t.extern {}", ext)?;
        }
        Ok(())
    }

    fn prologue(&self, out: &mut impl Write) -> Result<()> {
        writeln!(out, "\tpushq %rbp")?;
        writeln!(out, "\tmovq %rsp, %rbp")?;
        writeln!(out, "\tsubq ${}, %rsp", self.options.allocate)?;
        if self.options.base_offset > 0 {
            writeln!(out, "\tsubq ${}, %rbp", self.options.base_offset)?;
        }
        Ok(())
    }

    fn epilogue(&self, lbl: &Label, out: &mut impl Write) -> Result<()> {
        writeln!(out, "__{}__end__{}:", lbl.name, lbl.start)?;
        writeln!(
            out,
            "\taddq ${}, %rsp",
            self.options.allocate as i64 + lbl.extra_stack_allocation as i64
        )?;
        writeln!(out, "\tpopq %rbp")?;
        // Bare `ret`, not the reference's harmless `retb` (§9.ii).
        writeln!(out, "\tret")?;
        Ok(())
    }

    fn loop_markers(&self, i: usize, out: &mut impl Write) -> Result<()> {
        for (k, lp) in self.ctx.done_loops.iter().enumerate() {
            if lp.start == i {
                writeln!(out, "__loop__start__{k}:")?;
                writeln!(out, "\tcmp{} $0, (%rbp)", self.width.suffix())?;
                writeln!(out, "\tje __loop__end__{k}")?;
            } else if lp.end == i {
                writeln!(out, "\tjmp __loop__start__{k}")?;
                writeln!(out, "__loop__end__{k}:")?;
            }
        }
        Ok(())
    }

    fn calls(&mut self, i: usize, out: &mut impl Write) -> Result<()> {
        let ctx = self.ctx;
        for call in &ctx.calls {
            if call.position == i {
                self.regs.unsync_call_clobbers();
                writeln!(out, "\tcall {}", call.name)?;
                writeln!(
                    out,
                    "\tmov{} %{}, (%rbp)",
                    self.width.suffix(),
                    self.regs.rax.name_at(self.width)
                )?;
            }
        }
        Ok(())
    }

    fn moves(&self, i: usize, out: &mut impl Write) -> Result<()> {
        for mv in &self.ctx.moves {
            if mv.position == i {
                writeln!(out, "\tmov{} ${}, (%rbp)", self.width.suffix(), mv.value)?;
            }
        }
        Ok(())
    }

    fn width_switches(&mut self, i: usize) {
        for sw in &self.ctx.switches {
            if sw.position == i {
                self.width = sw.width;
            }
        }
    }

    fn emit_syscall(&mut self, out: &mut impl Write) -> Result<()> {
        if self.regs.rax.sync(SYS_WRITE) {
            writeln!(out, "\tmovq ${SYS_WRITE}, %rax")?;
        }
        if self.regs.rdi.sync(STDOUT_FD) {
            writeln!(out, "\tmovq ${STDOUT_FD}, %rdi")?;
        }
        // rsi's value is an address, never cached.
        writeln!(out, "\tmovq %rbp, %rsi")?;
        if self.regs.rdx.sync(1) {
            writeln!(out, "\tmovq $1, %rdx")?;
        }
        writeln!(out, "\tsyscall")?;
        self.regs.rcx.unsync();
        self.regs.r11.unsync();
        Ok(())
    }

    fn emit_argument(&mut self, ins: &BfInstruction, out: &mut impl Write) -> Result<()> {
        let width = self.width;
        if ins.count <= 6 {
            let reg = self.regs.arg(ins.count).expect("count <= 6 checked above");
            reg.unsync();
            if ins.address {
                // An address is always 8 bytes, regardless of the current
                // cell width — unlike the reference, which reuses
                // `currentWidth` here and so would truncate the pointer
                // into a 32/16/8-bit sub-register.
                writeln!(out, "\tmovq %rbp, %{}", reg.name64())?;
            } else {
                writeln!(out, "\tmov{} (%rbp), %{}", width.suffix(), reg.name_at(width))?;
            }
        } else {
            let offset = (ins.count - 7) as i64 * 8;
            if ins.address {
                if offset > 0 {
                    writeln!(out, "\tmovq %rbp, {offset}(%rsp)")?;
                } else {
                    writeln!(out, "\tmovq %rbp, (%rsp)")?;
                }
            } else {
                self.regs.rax.unsync();
                writeln!(out, "\tmov{} (%rbp), %{}", width.suffix(), self.regs.rax.name_at(width))?;
                if offset > 0 {
                    writeln!(out, "\tmovq %rax, {offset}(%rsp)")?;
                } else {
                    writeln!(out, "\tmovq %rax, (%rsp)")?;
                }
            }
        }
        Ok(())
    }

    fn emit_getarg(&mut self, ins: &BfInstruction, out: &mut impl Write) -> Result<()> {
        let width = self.width;
        if ins.count <= 6 {
            let reg = self.regs.arg(ins.count).expect("count <= 6 checked above");
            let src = reg.name_at(width);
            if ins.address {
                writeln!(out, "\tmov{} %{src}, %{}", width.suffix(), self.regs.frame.name_at(width))?;
            } else {
                writeln!(out, "\tmov{} %{src}, (%rbp)", width.suffix())?;
            }
        } else {
            self.diagnostics
                .warn("Accepting stack arguments isnt available currently", None);
        }
        Ok(())
    }

    fn instructions(&mut self, i: usize, out: &mut impl Write) -> Result<()> {
        let ctx = self.ctx;
        for ins in &ctx.instructions {
            if ins.position != i {
                continue;
            }
            match ins.ty {
                BfOpType::Plus => {
                    writeln!(out, "\tadd{} ${}, (%rbp)", self.width.suffix(), ins.count)?;
                }
                BfOpType::Minus => {
                    writeln!(out, "\tsub{} ${}, (%rbp)", self.width.suffix(), ins.count)?;
                }
                BfOpType::Left => {
                    writeln!(out, "\taddq ${}, %rbp", ins.count as i64 * self.width.multiplier())?;
                }
                BfOpType::Right => {
                    writeln!(out, "\tsubq ${}, %rbp", ins.count as i64 * self.width.multiplier())?;
                }
                BfOpType::Output => {
                    for _ in 0..ins.count {
                        self.emit_syscall(out)?;
                    }
                }
                BfOpType::Argument => self.emit_argument(ins, out)?,
                BfOpType::GetArg => self.emit_getarg(ins, out)?,
                BfOpType::Loop | BfOpType::None => {}
            }
            writeln!(out, "\t#\t{}", operator_char(ins.ty).to_string().repeat(ins.count as usize))?;
        }
        Ok(())
    }

    fn returns(&mut self, i: usize, out: &mut impl Write) -> Result<()> {
        let ctx = self.ctx;
        for ret in &ctx.returns {
            if ret.position != i {
                continue;
            }
            let lbl = &ctx.labels[ret.label_index];
            if !lbl.is_void() {
                self.regs.rax.unsync();
                let width = return_width(lbl.return_type);
                writeln!(out, "\tmov{} (%rbp), %{}", width.suffix(), self.regs.rax.name_at(width))?;
            }
            writeln!(out, "\tjmp __{}__end__{}", lbl.name, lbl.start)?;
        }
        Ok(())
    }

    fn label_boundaries(&self, i: usize, out: &mut impl Write) -> Result<()> {
        for lbl in &self.ctx.labels {
            if lbl.end != 0 && i == lbl.end {
                self.epilogue(lbl, out)?;
            } else if i == lbl.start {
                writeln!(out, "\t.p2align 4")?;
                writeln!(out, "{}:", lbl.name)?;
                self.prologue(out)?;
            }
        }
        Ok(())
    }

    fn run(&mut self, out: &mut impl Write) -> Result<()> {
        self.header(out)?;
        for i in 0..self.ctx.last_position {
            self.loop_markers(i, out)?;
            self.calls(i, out)?;
            self.moves(i, out)?;
            self.width_switches(i);
            self.instructions(i, out)?;
            self.returns(i, out)?;
            self.label_boundaries(i, out)?;
        }
        // The last label's `end` stays 0 ("open to end of input"); close it
        // here instead of replicating the reference's position-0 sentinel
        // trick (§9 "Label boundaries").
        if let Some(lbl) = self.ctx.labels.iter().find(|l| l.end == 0) {
            self.epilogue(lbl, out)?;
        }
        Ok(())
    }
}

/// Generates AT&T/GAS assembly for `ctx` into `out`.
pub fn generate(
    ctx: &ParsedContext,
    options: CodegenOptions,
    diagnostics: &mut Diagnostics,
    out: &mut impl Write,
) -> Result<()> {
    Generator::new(ctx, options, diagnostics).run(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bfppc_lex::{classify_keywords, tokenize};

    fn compile(src: &str) -> (String, Diagnostics) {
        let mut tokens = tokenize(src.as_bytes());
        classify_keywords(&mut tokens);
        let mut diags = Diagnostics::new();
        let ctx = bfppc_par::parse(&tokens, &mut diags);
        let mut buf = Vec::new();
        generate(&ctx, CodegenOptions::default(), &mut diags, &mut buf).unwrap();
        (String::from_utf8(buf).unwrap(), diags)
    }

    #[test]
    fn scenario_simple_output() {
        let (asm, _) = compile("@main: void +++ .");
        assert!(asm.contains(".globl main"));
        assert!(asm.contains("main:"));
        assert!(asm.contains("addb $3, (%rbp)"));
        assert!(asm.contains("movq $1, %rax"));
        assert!(asm.contains("movq $1, %rdi"));
        assert!(asm.contains("movq %rbp, %rsi"));
        assert!(asm.contains("movq $1, %rdx"));
        assert!(asm.contains("syscall"));
    }

    #[test]
    fn scenario_width_switch_keeps_output_at_one_byte() {
        let (asm, _) = compile("@main: void ?i32 ?mov 0x41 .");
        assert!(asm.contains("movl $65, (%rbp)"));
        assert!(asm.contains("movq $1, %rdx"));
        assert!(!asm.contains("movq $4, %rdx"));
    }

    #[test]
    fn scenario_loop_brackets() {
        let (asm, _) = compile("@main: void [+]");
        assert!(asm.contains("__loop__start__0:"));
        assert!(asm.contains("cmpb $0, (%rbp)"));
        assert!(asm.contains("je __loop__end__0"));
        assert!(asm.contains("addb $1, (%rbp)"));
        assert!(asm.contains("jmp __loop__start__0"));
        assert!(asm.contains("__loop__end__0:"));
    }

    #[test]
    fn scenario_extern_call_and_address_of() {
        let (asm, _) = compile("?extern puts @main: void *1^ ?call puts");
        assert!(asm.contains(".extern puts"));
        assert!(asm.contains("movq %rbp, %rdi"));
        assert!(asm.contains("call puts"));
        assert!(asm.contains("movb %al, (%rbp)"));
    }

    #[test]
    fn scenario_typed_return() {
        let (asm, _) = compile("@f: i32 +++ !");
        assert!(asm.contains("movl (%rbp), %eax"));
        assert!(asm.contains("jmp __f__end__"));
    }

    #[test]
    fn scenario_seven_arguments_spill_to_stack() {
        let (asm, _) = compile("@main: void *1 *2 *3 *4 *5 *6 *7");
        assert!(asm.contains("%dil"));
        assert!(asm.contains("%sil"));
        assert!(asm.contains("%dl"));
        assert!(asm.contains("%cl"));
        assert!(asm.contains("%r8b"));
        assert!(asm.contains("%r9b"));
        assert!(asm.contains("movb (%rbp), %al"));
        assert!(asm.contains("movq %rax, (%rsp)"));
    }

    #[test]
    fn register_sync_peephole_skips_redundant_setup() {
        let (asm, _) = compile("@main: void ..");
        let setup_lines = asm.matches("movq $1, %rax").count();
        let rdi_lines = asm.matches("movq $1, %rdi").count();
        let rsi_lines = asm.matches("movq %rbp, %rsi").count();
        let syscalls = asm.matches("syscall").count();
        assert_eq!(setup_lines, 1);
        assert_eq!(rdi_lines, 1);
        assert_eq!(syscalls, 2);
        assert_eq!(rsi_lines, 2);
    }

    #[test]
    fn getarg_past_sixth_argument_is_diagnosed_and_skipped() {
        let (asm, diags) = compile("@main: void &7");
        assert!(!diags.is_empty());
        assert!(!asm.contains("movq %rbp, %r"));
    }
}
