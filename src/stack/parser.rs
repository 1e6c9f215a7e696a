use crate::stack::Frame;
use crate::stack::Stack;

// -----------------------------------------------------------------------------
// Stack Parser
// -----------------------------------------------------------------------------

/// Turns a raw stack dump into a structured [`Stack`].
///
/// Implementations must never fail or panic: malformed input degrades to
/// empty or zero fields for the affected frame.
pub trait StackParser: Send + Sync {
  /// Parses `text` into a stack, preserving the order of the dump.
  fn parse(&self, text: &str) -> Stack;
}

// -----------------------------------------------------------------------------
// Text Parser
// -----------------------------------------------------------------------------

/// Parser for the pair-structured text dump.
///
/// # Format
///
/// ```text
/// goroutine 1 [running]:
/// github.com/acme/app/server.(*Server).Run(0xc000010000)
///         /home/acme/app/server/server.go:42 +0x1d
/// main.main()
///         /home/acme/app/main.go:12 +0x25
/// ```
///
/// The first line is a header and is ignored. Every remaining non-empty
/// line belongs to a pair: a function line followed by a location line.
/// Empty lines are skipped without breaking up a pair, and a function line
/// without its location line is dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextParser;

impl TextParser {
  /// Creates a new `TextParser`.
  #[inline]
  pub const fn new() -> Self {
    Self
  }
}

impl StackParser for TextParser {
  fn parse(&self, text: &str) -> Stack {
    let mut stack: Stack = Stack::with_default_capacity();
    let mut function: Option<(String, String)> = None;

    for line in text.lines().skip(1) {
      if line.is_empty() {
        continue;
      }

      match function.take() {
        None => {
          function = Some(parse_function(line));
        }
        Some((package_name, method_name)) => {
          let (file_name, line_number): (&str, u32) = parse_location(line);
          stack.push(Frame::new(package_name, file_name, method_name, line_number));
        }
      }
    }

    stack
  }
}

/// Splits a function line into its package and method names.
fn parse_function(line: &str) -> (String, String) {
  let (path, item): (&str, &str) = split_at_last_slash(line);
  let (short, method): (&str, &str) = item.split_once('.').unwrap_or((item, ""));

  let package: String = if path.is_empty() {
    short.to_owned()
  } else {
    format!("{path}/{short}")
  };

  (package, method.to_owned())
}

/// Splits a location line into its file name and line number.
///
/// A trailing ` +0x..` offset annotation is dropped first.
fn parse_location(line: &str) -> (&str, u32) {
  let line: &str = line.trim_start();
  let line: &str = match line.rsplit_once(' ') {
    Some((head, tail)) if tail.starts_with('+') => head,
    Some(_) | None => line,
  };
  let (_, file_and_line): (&str, &str) = split_at_last_slash(line);

  let mut parts: _ = file_and_line.split(':');

  let file: &str = parts.next().unwrap_or_default();
  let line: u32 = parts.next().and_then(|part| part.parse().ok()).unwrap_or(0);

  (file, line)
}

#[inline]
fn split_at_last_slash(line: &str) -> (&str, &str) {
  line.rsplit_once('/').unwrap_or(("", line))
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::stack::Frame;
  use crate::stack::Stack;
  use crate::stack::StackParser;
  use crate::stack::TextParser;

  const DUMP: &str = "goroutine 1 [running]:
github.com/acme/app/server.(*Server).Run(0xc000010000)
\t/home/acme/app/server/server.go:42 +0x1d
github.com/acme/app/vendor.x.y.Handle(...)
\t/home/acme/app/vendor/x.go:7 +0x88
main.main()
\t/home/acme/app/main.go:12 +0x25
";

  fn parse(text: &str) -> Stack {
    TextParser::new().parse(text)
  }

  #[test]
  fn test_parse_pairs_in_order() {
    let stack: Stack = parse(DUMP);

    assert_eq!(
      stack.frames(),
      &[
        Frame::new("github.com/acme/app/server", "server.go", "(*Server).Run(0xc000010000)", 42),
        Frame::new("github.com/acme/app/vendor", "x.go", "x.y.Handle(...)", 7),
        Frame::new("main", "main.go", "main()", 12),
      ],
    );
  }

  #[test]
  fn test_parse_header_only() {
    assert!(parse("goroutine 1 [running]:").is_empty());
    assert!(parse("").is_empty());
  }

  #[test]
  fn test_parse_malformed_location() {
    let stack: Stack = parse("header\nfoo.Bar()\nbadfile\n");

    assert_eq!(stack.frames(), &[Frame::new("foo", "badfile", "Bar()", 0)]);
  }

  #[test]
  fn test_parse_bad_line_number() {
    let stack: Stack = parse("header\nfoo.Bar()\n\t/src/foo.go:abc +0x1\nfoo.Baz()\n\t/src/foo.go: +0x1\n");

    assert_eq!(stack.len(), 2);
    assert_eq!(stack.frames()[0].line_number(), 0);
    assert_eq!(stack.frames()[0].file_name(), "foo.go");
    assert_eq!(stack.frames()[1].line_number(), 0);
  }

  #[test]
  fn test_parse_empty_lines_keep_parity() {
    let stack: Stack = parse("header\n\nfoo.Bar()\n\n\n\t/src/foo.go:3 +0x1\n\nmain.main()\n\n\t/src/main.go:9 +0x2\n");

    assert_eq!(
      stack.frames(),
      &[
        Frame::new("foo", "foo.go", "Bar()", 3),
        Frame::new("main", "main.go", "main()", 9),
      ],
    );
  }

  #[test]
  fn test_parse_drops_unmatched_function() {
    let stack: Stack = parse("header\nfoo.Bar()\n\t/src/foo.go:3 +0x1\nmain.main()\n");

    assert_eq!(stack.frames(), &[Frame::new("foo", "foo.go", "Bar()", 3)]);
  }

  #[test]
  fn test_parse_function_without_method() {
    let stack: Stack = parse("header\nruntime/debug\n\t/src/debug.go:1\n");

    assert_eq!(stack.frames(), &[Frame::new("runtime/debug", "debug.go", "", 1)]);
  }

  #[test]
  fn test_parse_location_without_suffix() {
    let stack: Stack = parse("header\nmain.main()\n\t/src/main.go:9\n");

    assert_eq!(stack.frames(), &[Frame::new("main", "main.go", "main()", 9)]);
  }

  #[test]
  fn test_parse_path_with_spaces() {
    let stack: Stack = parse("header\nmain.main()\n\t/home/my docs/main.go:9 +0x2\n");

    assert_eq!(stack.frames(), &[Frame::new("main", "main.go", "main()", 9)]);
  }

  #[test]
  fn test_parse_path_with_spaces_without_suffix() {
    let stack: Stack = parse("header\nmain.main()\n\t/home/my docs/main.go:9\n");

    assert_eq!(stack.frames(), &[Frame::new("main", "main.go", "main()", 9)]);
  }

  #[test]
  fn test_parse_n_pairs() {
    let mut text: String = String::from("header\n");

    for index in 0..100 {
      text.push_str(&format!("pkg{index}.fn{index}()\n\t/src/f{index}.go:{index} +0x0\n"));
    }

    let stack: Stack = parse(&text);

    assert_eq!(stack.len(), 100);

    for (index, frame) in stack.iter().enumerate() {
      assert_eq!(frame.package_name(), format!("pkg{index}"));
      assert_eq!(frame.line_number(), index as u32);
    }
  }
}
