use backtrace::Backtrace;
use backtrace::BacktraceFrame;
use backtrace::BacktraceSymbol;
use std::fmt::Write;
use std::path::Path;
use std::thread;

use crate::consts::DEFAULT_DUMP_CAPACITY;
use crate::consts::UNKNOWN_FILE;
use crate::consts::UNKNOWN_FUNCTION;

// -----------------------------------------------------------------------------
// Stack Source
// -----------------------------------------------------------------------------

/// Provides the raw text dump of the calling thread's stack.
pub trait StackSource: Send + Sync {
  /// Returns a dump of the current call stack.
  ///
  /// Only the calling thread is captured.
  fn raw_dump(&self) -> String;
}

// -----------------------------------------------------------------------------
// Thread Dump
// -----------------------------------------------------------------------------

/// Host platform [`StackSource`] backed by the [`backtrace`] crate.
///
/// The dump uses the pair format understood by [`TextParser`]:
///
/// ```text
/// thread 'main' [running]:
/// faultline/recover/controller.Controller.recover
/// 	/src/faultline/src/recover/controller.rs:212 +0x55d3a1c2
/// std/panicking.begin_panic_handler.{{closure}}
/// 	/rustc/library/std/src/panicking.rs:665 +0x55d3a0f0
/// ```
///
/// Function lines are written as `module/path/short.Item.method`: every
/// leading module segment but the last is joined with `/`, the rest of the
/// symbol path is joined with `.`. Frames without a resolvable name or
/// location use `?` and `??:0` respectively.
///
/// The dump never exceeds its capacity; the first line that does not fit
/// ends the dump.
///
/// [`TextParser`]: crate::stack::TextParser
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct ThreadDump {
  capacity: usize,
}

impl ThreadDump {
  /// Creates a new `ThreadDump` with the default capacity.
  #[inline]
  pub const fn new() -> Self {
    Self::with_capacity(DEFAULT_DUMP_CAPACITY)
  }

  /// Creates a new `ThreadDump` bounded to `capacity` bytes.
  #[inline]
  pub const fn with_capacity(capacity: usize) -> Self {
    Self { capacity }
  }

  /// Returns the maximum size of a dump in bytes.
  #[inline]
  pub const fn capacity(&self) -> usize {
    self.capacity
  }
}

impl Default for ThreadDump {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl StackSource for ThreadDump {
  fn raw_dump(&self) -> String {
    let trace: Backtrace = Backtrace::new();
    let mut dump: DumpWriter = DumpWriter::new(self.capacity);

    let header: String = match thread::current().name() {
      Some(name) => format!("thread '{name}' [running]:"),
      None => String::from("thread '<unnamed>' [running]:"),
    };

    if !dump.line(&header) {
      return dump.finish();
    }

    'frames: for frame in trace.frames() {
      for symbol in frame.symbols() {
        if !dump.line(&function_line(symbol)) {
          break 'frames;
        }

        if !dump.line(&location_line(frame, symbol)) {
          break 'frames;
        }
      }
    }

    dump.finish()
  }
}

// -----------------------------------------------------------------------------
// Dump Writer
// -----------------------------------------------------------------------------

/// Line buffer with a fixed byte capacity.
struct DumpWriter {
  buffer: String,
  capacity: usize,
}

impl DumpWriter {
  #[inline]
  fn new(capacity: usize) -> Self {
    Self {
      buffer: String::with_capacity(capacity.min(DEFAULT_DUMP_CAPACITY)),
      capacity,
    }
  }

  /// Appends `line`, returns `false` if it does not fit.
  fn line(&mut self, line: &str) -> bool {
    if self.buffer.len() + line.len() + 1 > self.capacity {
      return false;
    }

    self.buffer.push_str(line);
    self.buffer.push('\n');

    true
  }

  #[inline]
  fn finish(self) -> String {
    self.buffer
  }
}

// -----------------------------------------------------------------------------
// Symbol Rendering
// -----------------------------------------------------------------------------

fn function_line(symbol: &BacktraceSymbol) -> String {
  match symbol.name() {
    Some(name) => render_function(&format!("{name:#}")),
    None => UNKNOWN_FUNCTION.to_owned(),
  }
}

fn location_line(frame: &BacktraceFrame, symbol: &BacktraceSymbol) -> String {
  let mut line: String = String::from("\t");

  match symbol.filename() {
    Some(path) => line.push_str(&render_path(path)),
    None => line.push_str(UNKNOWN_FILE),
  }

  let _ignore: _ = write!(
    line,
    ":{} +{:#x}",
    symbol.lineno().unwrap_or(0),
    frame.ip() as usize,
  );

  line
}

#[inline]
fn render_path(path: &Path) -> String {
  path.display().to_string().replace('\\', "/")
}

/// Renders a demangled symbol path as a function line.
///
/// Module segments are the leading lowercase identifiers of the path. A
/// function that encloses a closure or shim stays with the item, and the last
/// path segment is always part of the item.
///
/// ```text
/// app::net::Server::run            -> app/net.Server.run
/// app::main                        -> app.main
/// app::net::handle::{{closure}}    -> app/net.handle.{{closure}}
/// app::net::spawn::<F, T>          -> app/net.spawn::<F, T>
/// <T as core::ops::Drop>::drop     -> .<T as core::ops::Drop>.drop
/// ```
fn render_function(symbol: &str) -> String {
  let segments: Vec<&str> = split_path(symbol);

  let split: usize = match segments.iter().position(|segment| !is_module(segment)) {
    Some(index) if is_anonymous(segments[index]) => index.saturating_sub(1),
    Some(index) => index,
    None => segments.len() - 1,
  };

  let (module, item): (&[&str], &[&str]) = segments.split_at(split);

  let mut output: String = module.join("/");

  output.push('.');
  output.push_str(&item.join("."));
  output
}

/// Splits a symbol path on `::` outside of generic brackets.
///
/// Turbofish arguments (`::<F, T>`) stay attached to the preceding segment.
fn split_path(symbol: &str) -> Vec<&str> {
  let bytes: &[u8] = symbol.as_bytes();
  let mut segments: Vec<&str> = Vec::new();
  let mut depth: usize = 0;
  let mut start: usize = 0;
  let mut index: usize = 0;

  while index < bytes.len() {
    match bytes[index] {
      b'<' => depth += 1,
      b'>' if index > 0 && bytes[index - 1] == b'-' => {}
      b'>' => depth = depth.saturating_sub(1),
      b':' if depth == 0 && bytes.get(index + 1) == Some(&b':') => {
        index += 2;

        if index > 2 && bytes.get(index) == Some(&b'<') {
          continue;
        }

        segments.push(&symbol[start..index - 2]);
        start = index;
        continue;
      }
      _ => {}
    }

    index += 1;
  }

  segments.push(&symbol[start..]);
  segments
}

/// Closures, shims and other compiler-generated items (`{{closure}}`).
#[inline]
fn is_anonymous(segment: &str) -> bool {
  segment.starts_with('{')
}

#[inline]
fn is_module(segment: &str) -> bool {
  let mut chars: _ = segment.chars();

  matches!(chars.next(), Some(head) if head.is_ascii_lowercase() || head == '_')
    && chars.all(|char| char.is_ascii_alphanumeric() || char == '_')
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::stack::Stack;
  use crate::stack::StackParser;
  use crate::stack::StackSource;
  use crate::stack::TextParser;
  use crate::stack::ThreadDump;
  use crate::stack::dump::render_function;
  use crate::stack::dump::split_path;

  #[test]
  fn test_render_method() {
    assert_eq!(
      render_function("faultline::recover::controller::Controller::recover"),
      "faultline/recover/controller.Controller.recover",
    );
  }

  #[test]
  fn test_render_free_function() {
    assert_eq!(render_function("app::main"), "app.main");
    assert_eq!(render_function("std::rt::lang_start::{{closure}}"), "std/rt.lang_start.{{closure}}");
  }

  #[test]
  fn test_render_closure() {
    assert_eq!(
      render_function("app::server::handle::{{closure}}"),
      "app/server.handle.{{closure}}",
    );
    assert_eq!(
      render_function("app::server::Server::run::{{closure}}"),
      "app/server.Server.run.{{closure}}",
    );
    assert_eq!(
      render_function("app::server::handle::{{closure}}::{{closure}}"),
      "app/server.handle.{{closure}}.{{closure}}",
    );
    assert_eq!(render_function("{{closure}}"), ".{{closure}}");
  }

  #[test]
  fn test_render_turbofish() {
    assert_eq!(
      render_function("std::sys::backtrace::__rust_end_short_backtrace::<F, T>"),
      "std/sys/backtrace.__rust_end_short_backtrace::<F, T>",
    );
    assert_eq!(
      render_function("app::spawn::<F>::{{closure}}"),
      "app.spawn::<F>.{{closure}}",
    );
  }

  #[test]
  fn test_rendered_closure_parses() {
    let text: String = format!(
      "header\n{}\n\t/src/server.rs:7 +0x1\n{}\n\t/rust/library/std/src/sys/backtrace.rs:168 +0x2\n",
      render_function("app::server::handle::{{closure}}"),
      render_function("std::sys::backtrace::__rust_end_short_backtrace::<F, T>"),
    );

    let stack: Stack = TextParser::new().parse(&text);

    assert_eq!(stack.len(), 2);
    assert_eq!(stack.frames()[0].package_name(), "app/server");
    assert_eq!(stack.frames()[0].method_name(), "handle.{{closure}}");
    assert_eq!(stack.frames()[1].package_name(), "std/sys/backtrace");
    assert_eq!(stack.frames()[1].method_name(), "__rust_end_short_backtrace::<F, T>");
  }

  #[test]
  fn test_render_root_symbol() {
    assert_eq!(render_function("main"), ".main");
    assert_eq!(
      render_function("<alloc::boxed::Box<F> as core::ops::function::FnOnce<A>>::call_once"),
      ".<alloc::boxed::Box<F> as core::ops::function::FnOnce<A>>.call_once",
    );
  }

  #[test]
  fn test_split_path_generics() {
    assert_eq!(
      split_path("core::ptr::drop_in_place<fn() -> alloc::string::String>"),
      ["core", "ptr", "drop_in_place<fn() -> alloc::string::String>"],
    );
    assert_eq!(split_path("app::spawn::<F>::{{closure}}"), ["app", "spawn::<F>", "{{closure}}"]);
  }

  #[test]
  fn test_rendered_function_parses() {
    let text: String = format!(
      "header\n{}\n\t/src/recover/controller.rs:212 +0x1\n",
      render_function("faultline::recover::controller::Controller::recover"),
    );

    let stack: Stack = TextParser::new().parse(&text);

    assert_eq!(stack.len(), 1);
    assert_eq!(stack.frames()[0].package_name(), "faultline/recover/controller");
    assert_eq!(stack.frames()[0].method_name(), "Controller.recover");
    assert_eq!(stack.frames()[0].file_name(), "controller.rs");
    assert_eq!(stack.frames()[0].line_number(), 212);
  }

  #[test]
  fn test_raw_dump_header() {
    let dump: String = ThreadDump::new().raw_dump();

    assert!(dump.starts_with("thread '"));
    assert!(dump.lines().next().unwrap().ends_with("[running]:"));
  }

  #[test]
  fn test_raw_dump_parses() {
    let dump: String = ThreadDump::new().raw_dump();
    let stack: Stack = TextParser::new().parse(&dump);

    assert!(!stack.is_empty());
  }

  #[test]
  fn test_raw_dump_capacity() {
    let dump: String = ThreadDump::with_capacity(256).raw_dump();

    assert!(dump.len() <= 256);
    assert!(ThreadDump::with_capacity(4).raw_dump().is_empty());
  }
}
