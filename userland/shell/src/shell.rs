//! Интерактивное меню / Interactive menu
//!
//! Пункты / Items:
//!   1 create   2 kill    3 table   4 run scheduler   5 block
//!   6 alloc    7 free    8 files   9 exit
//!
//! Ввод и вывод абстрагированы, чтобы меню можно было гонять в тестах.
//! Input and output are abstract so the menu can be driven from tests.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use libossim::Pid;
use ossim_kernel::Kernel;

use crate::fs::FileStore;

const MENU: &str = "\
Choose an option:
1) Create Process
2) Kill Process
3) Show Process Table
4) Run Scheduler (MLFQ)
5) Block Process (I/O) / Unblock handled by scheduler
6) Allocate Memory to Process
7) Free Memory of Process
8) File System: create/write/read file
9) Exit
";

const DEFAULT_NAME:      &str  = "proc";
const DEFAULT_BURST:     u32   = 10;
const DEFAULT_PRIORITY:  i32   = 0;
const DEFAULT_MAX_TICKS: u64   = 200;
const DEFAULT_IO_TICKS:  u32   = 3;
const DEFAULT_ALLOC:     usize = 64;

/// Результат одного пункта меню / Outcome of one menu item
enum Step {
    Continue,
    Exit,
}

/// Ввод оборвался / Input ended
struct Eof;

enum Prompt<T> {
    Value(T),
    Invalid,
}

pub struct Shell<R, W> {
    kernel: Kernel,
    files:  FileStore,
    input:  R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(kernel: Kernel, input: R, output: W) -> Self {
        Self { kernel, files: FileStore::new(), input, output }
    }

    #[cfg(test)]
    fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    #[cfg(test)]
    fn files(&self) -> &FileStore {
        &self.files
    }

    /// Крутить меню до `9` или конца ввода.
    /// Loop over the menu until `9` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "=== Simple OS Simulator ===")?;
        loop {
            write!(self.output, "{MENU}")?;
            let step = match self.prompt::<u32>("Enter choice [1-9]: ", None)? {
                Err(Eof) => Step::Exit,
                Ok(Prompt::Invalid) => {
                    writeln!(self.output, "Invalid input.")?;
                    Step::Continue
                }
                Ok(Prompt::Value(choice)) => match self.dispatch(choice)? {
                    Ok(step) => step,
                    Err(Eof) => Step::Exit,
                },
            };
            if let Step::Exit = step {
                writeln!(self.output, "Exiting simulator.")?;
                return Ok(());
            }
        }
    }

    fn dispatch(&mut self, choice: u32) -> io::Result<Result<Step, Eof>> {
        match choice {
            1 => self.create(),
            2 => self.kill(),
            3 => {
                writeln!(self.output, "{}", self.kernel.snapshot())?;
                Ok(Ok(Step::Continue))
            }
            4 => self.run_scheduler(),
            5 => self.block(),
            6 => self.alloc(),
            7 => self.free(),
            8 => self.file_store(),
            9 => Ok(Ok(Step::Exit)),
            _ => {
                writeln!(self.output, "Unknown choice.")?;
                Ok(Ok(Step::Continue))
            }
        }
    }

    fn create(&mut self) -> io::Result<Result<Step, Eof>> {
        let name = match self.line("Process name: ")? {
            Ok(name) if name.is_empty() => DEFAULT_NAME.to_owned(),
            Ok(name) => name,
            Err(eof) => return Ok(Err(eof)),
        };
        let Some(burst) = self.value("CPU burst (units): ", Some(DEFAULT_BURST))? else {
            return Ok(Ok(Step::Continue));
        };
        let Some(priority) = self.value("Priority (int, hint): ", Some(DEFAULT_PRIORITY))? else {
            return Ok(Ok(Step::Continue));
        };

        let pid = self.kernel.create_process(&name, burst, priority);
        writeln!(self.output, "[CREATE] PID={pid} Name={name} Burst={burst} Priority={priority}")?;
        Ok(Ok(Step::Continue))
    }

    fn kill(&mut self) -> io::Result<Result<Step, Eof>> {
        let Some(pid) = self.pid("PID to kill: ")? else { return Ok(Ok(Step::Continue)) };
        match self.kernel.kill_process(pid) {
            Ok(()) => writeln!(self.output, "[KILL] PID={pid} terminated and resources freed.")?,
            Err(err) => writeln!(self.output, "[KILL] {err}")?,
        }
        Ok(Ok(Step::Continue))
    }

    fn run_scheduler(&mut self) -> io::Result<Result<Step, Eof>> {
        let Some(max_ticks) = self.value("Max ticks to run (e.g., 200): ", Some(DEFAULT_MAX_TICKS))?
        else {
            return Ok(Ok(Step::Continue));
        };
        let stats = self.kernel.run_scheduler(max_ticks);
        writeln!(self.output, "[SCHED] Scheduler finished. Stats:")?;
        writeln!(self.output, "{stats}")?;
        if let Some(avg) = stats.average_turnaround() {
            writeln!(self.output, "Average turnaround: {avg:.2} ticks")?;
        }
        Ok(Ok(Step::Continue))
    }

    fn block(&mut self) -> io::Result<Result<Step, Eof>> {
        let Some(pid) = self.pid("PID to block: ")? else { return Ok(Ok(Step::Continue)) };
        let Some(io_ticks) = self.value("I/O wait ticks: ", Some(DEFAULT_IO_TICKS))? else {
            return Ok(Ok(Step::Continue));
        };
        match self.kernel.block_process(pid, io_ticks) {
            Ok(()) => writeln!(self.output, "[BLOCK] PID={pid} blocked for I/O ({io_ticks} ticks).")?,
            Err(err) => writeln!(self.output, "[BLOCK] {err}")?,
        }
        Ok(Ok(Step::Continue))
    }

    fn alloc(&mut self) -> io::Result<Result<Step, Eof>> {
        let Some(pid) = self.pid("PID to alloc memory to: ")? else { return Ok(Ok(Step::Continue)) };
        let Some(size) = self.value("Size units to allocate: ", Some(DEFAULT_ALLOC))? else {
            return Ok(Ok(Step::Continue));
        };
        match self.kernel.allocate_memory_to_process(pid, size) {
            Ok(block) => writeln!(self.output, "[ALLOC] PID={pid} allocated memory {block}")?,
            Err(err) => writeln!(self.output, "[ALLOC] {err}")?,
        }
        Ok(Ok(Step::Continue))
    }

    fn free(&mut self) -> io::Result<Result<Step, Eof>> {
        let Some(pid) = self.pid("PID to free memory of: ")? else { return Ok(Ok(Step::Continue)) };
        match self.kernel.free_memory_of_process(pid) {
            Ok(block) => writeln!(self.output, "[FREE] Freed memory {block} of PID={pid}")?,
            Err(err) => writeln!(self.output, "[FREE] {err}")?,
        }
        Ok(Ok(Step::Continue))
    }

    fn file_store(&mut self) -> io::Result<Result<Step, Eof>> {
        let sub = match self.line("Create(C) / Read(R) / List(L): ")? {
            Ok(sub) => sub.to_uppercase(),
            Err(eof) => return Ok(Err(eof)),
        };
        match sub.as_str() {
            "C" => {
                let name = match self.line("Filename: ")? {
                    Ok(name) => name,
                    Err(eof) => return Ok(Err(eof)),
                };
                let content = match self.raw_line("Content string: ")? {
                    Ok(content) => content,
                    Err(eof) => return Ok(Err(eof)),
                };
                let len = content.len();
                if self.files.create(&name, content.into_bytes()) {
                    writeln!(self.output, "[FS] File already exists, overwriting.")?;
                }
                writeln!(self.output, "[FS] Created/updated file '{name}' ({len} bytes)")?;
            }
            "R" => {
                let name = match self.line("Filename: ")? {
                    Ok(name) => name,
                    Err(eof) => return Ok(Err(eof)),
                };
                match self.files.read(&name) {
                    Some(data) => {
                        writeln!(self.output, "[FS] Read file '{name}' ({} bytes)", data.len())?;
                        writeln!(self.output, "{}", String::from_utf8_lossy(data))?;
                    }
                    None => writeln!(self.output, "[FS] No such file")?,
                }
            }
            "L" if self.files.is_empty() => writeln!(self.output, "[FS] No files")?,
            "L" => {
                for name in self.files.names() {
                    writeln!(self.output, "{name}")?;
                }
            }
            _ => writeln!(self.output, "Unknown FS option.")?,
        }
        Ok(Ok(Step::Continue))
    }

    // ── ввод / input ─────────────────────────────────────────────────────────

    fn line(&mut self, label: &str) -> io::Result<Result<String, Eof>> {
        Ok(self.raw_line(label)?.map(|text| text.trim().to_owned()))
    }

    /// Строка как есть, без перевода строки / The line as typed, minus the newline.
    fn raw_line(&mut self, label: &str) -> io::Result<Result<String, Eof>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(Err(Eof));
        }
        let text = buf.strip_suffix('\n').unwrap_or(&buf);
        let text = text.strip_suffix('\r').unwrap_or(text);
        Ok(Ok(text.to_owned()))
    }

    fn prompt<T: FromStr>(&mut self, label: &str, default: Option<T>) -> io::Result<Result<Prompt<T>, Eof>> {
        let text = match self.line(label)? {
            Ok(text) => text,
            Err(eof) => return Ok(Err(eof)),
        };
        let parsed = match (text.is_empty(), default) {
            (true, Some(default)) => Prompt::Value(default),
            _ => text.parse().map_or(Prompt::Invalid, Prompt::Value),
        };
        Ok(Ok(parsed))
    }

    /// `None` — ввод неверен или кончился (сообщение уже выведено).
    /// `None` — input was invalid or ended (message already printed).
    fn value<T: FromStr>(&mut self, label: &str, default: Option<T>) -> io::Result<Option<T>> {
        match self.prompt(label, default)? {
            Ok(Prompt::Value(v)) => Ok(Some(v)),
            Ok(Prompt::Invalid) | Err(Eof) => {
                writeln!(self.output, "Invalid input.")?;
                Ok(None)
            }
        }
    }

    fn pid(&mut self, label: &str) -> io::Result<Option<Pid>> {
        Ok(self.value::<u32>(label, None)?.map(Pid))
    }
}
