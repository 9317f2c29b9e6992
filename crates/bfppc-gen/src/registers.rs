//! Register descriptors (§3 "Register descriptor") and the fixed System V
//! argument-register set.

use bfppc_par::Width;

/// A physical x86-64 register at its four name widths, plus the sync state
/// the generator uses to elide redundant immediate loads.
#[derive(Debug, Clone)]
pub struct Register {
    qword: &'static str,
    dword: &'static str,
    word: &'static str,
    byte: &'static str,
    cached_value: i64,
    synced: bool,
}

impl Register {
    const fn new(qword: &'static str, dword: &'static str, word: &'static str, byte: &'static str) -> Self {
        Self {
            qword,
            dword,
            word,
            byte,
            cached_value: 0,
            synced: false,
        }
    }

    /// The bare register name (no `%` sigil) at the given width.
    pub fn name_at(&self, width: Width) -> &'static str {
        match width {
            Width::Byte => self.byte,
            Width::Word => self.word,
            Width::Dword => self.dword,
            Width::Qword => self.qword,
        }
    }

    /// Always the 64-bit name, regardless of current cell width.
    pub fn name64(&self) -> &'static str {
        self.qword
    }

    pub fn unsync(&mut self) {
        self.synced = false;
    }

    /// Marks the register as holding `value`. Returns `false` when it was
    /// already synced to that exact value — the caller should skip emitting
    /// the `mov` in that case.
    pub fn sync(&mut self, value: i64) -> bool {
        if self.synced && self.cached_value == value {
            false
        } else {
            self.synced = true;
            self.cached_value = value;
            true
        }
    }
}

/// The full BF++ register file, including the six System V argument-passing
/// aliases (`arg1..arg6` = `rdi, rsi, rdx, rcx, r8, r9`).
#[derive(Debug, Clone)]
pub struct Registers {
    pub frame: Register,
    pub stack: Register,
    pub rax: Register,
    pub rcx: Register,
    pub rdx: Register,
    pub rbx: Register,
    pub rsi: Register,
    pub rdi: Register,
    pub r8: Register,
    pub r9: Register,
    pub r10: Register,
    pub r11: Register,
    pub r12: Register,
    pub r13: Register,
    pub r14: Register,
    pub r15: Register,
}

impl Registers {
    pub fn new() -> Self {
        Self {
            frame: Register::new("rbp", "ebp", "bp", "bpl"),
            stack: Register::new("rsp", "esp", "sp", "spl"),
            rax: Register::new("rax", "eax", "ax", "al"),
            rcx: Register::new("rcx", "ecx", "cx", "cl"),
            rdx: Register::new("rdx", "edx", "dx", "dl"),
            rbx: Register::new("rbx", "ebx", "bx", "bl"),
            rsi: Register::new("rsi", "esi", "si", "sil"),
            rdi: Register::new("rdi", "edi", "di", "dil"),
            r8: Register::new("r8", "r8d", "r8w", "r8b"),
            r9: Register::new("r9", "r9d", "r9w", "r9b"),
            r10: Register::new("r10", "r10d", "r10w", "r10b"),
            r11: Register::new("r11", "r11d", "r11w", "r11b"),
            r12: Register::new("r12", "r12d", "r12w", "r12b"),
            r13: Register::new("r13", "r13d", "r13w", "r13b"),
            r14: Register::new("r14", "r14d", "r14w", "r14b"),
            // The reference gives r15 the same "r15w" name for both its
            // 16-bit and 8-bit fields (§9.iv); the 8-bit name is r15b.
            r15: Register::new("r15", "r15d", "r15w", "r15b"),
        }
    }

    /// Looks up the System V integer argument register for position `n`
    /// (1-indexed). Returns `None` for `n == 0` or `n >= 7` (stack-spilled).
    pub fn arg(&mut self, n: u32) -> Option<&mut Register> {
        match n {
            1 => Some(&mut self.rdi),
            2 => Some(&mut self.rsi),
            3 => Some(&mut self.rdx),
            4 => Some(&mut self.rcx),
            5 => Some(&mut self.r8),
            6 => Some(&mut self.r9),
            _ => None,
        }
    }

    /// Clears sync on every argument register and `%rax` — what a `call`
    /// clobbers under the System V ABI.
    pub fn unsync_call_clobbers(&mut self) {
        for n in 1..=6 {
            self.arg(n).expect("1..=6 are all valid arg slots").unsync();
        }
        self.rax.unsync();
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}
