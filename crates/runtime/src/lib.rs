//! Reference implementation of `PBString`.
//!
//! `PBString` is the sole value type of compiled PoiBoi programs: a
//! tagged union of four representations (static text, ref-counted heap
//! text, an inline small-string buffer, and a single-level rope join).
//! The compiler does not link against this crate — it embeds a
//! hand-written C-family rendition of the same semantics
//! (`crates/compiler/runtime_c/`) into every program it emits. This
//! crate exists so the semantics can be pinned down and tested without
//! a C toolchain; keep the two in lockstep when either changes.

use std::borrow::Cow;
use std::io::{self, Write};
use std::rc::Rc;

/// Largest length that fits in the inline [`SmallStr`] buffer.
///
/// Mirrors `SmallStringMaxLength()` in the original runtime: the buffer
/// is sized to `sizeof(RefCountedString) - 1` on a 64-bit target (two
/// pointers' worth of payload, 16 bytes, plus an 8-byte length field,
/// minus the one byte spent on the small string's own length), clamped
/// to 255. 23 comfortably satisfies the "at least 22 bytes" invariant.
pub const SMALL_MAX: usize = 23;

/// Above this many digits a numeric string is never treated as a parseable
/// size, independent of whether it actually overflows `usize`. Matches the
/// original's `MaxSizeNumChars()` for an 8-byte `size_t`.
const MAX_SIZE_DIGITS: usize = 20;

/// An inline, fixed-capacity string buffer (the `SMALL` representation).
#[derive(Clone, Copy)]
pub struct SmallStr {
    bytes: [u8; SMALL_MAX],
    len: u8,
}

impl SmallStr {
    fn from_str(s: &str) -> Self {
        assert!(s.len() <= SMALL_MAX, "string too long for SmallStr");
        let mut bytes = [0u8; SMALL_MAX];
        bytes[..s.len()].copy_from_slice(s.as_bytes());
        SmallStr {
            bytes,
            len: s.len() as u8,
        }
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.bytes[..self.len as usize])
            .expect("SmallStr only ever holds UTF-8 bytes copied from a &str")
    }
}

/// A view into a shared, ref-counted heap allocation (the `REF_COUNTED`
/// representation). Slicing (substring) clones the `Rc` and narrows the
/// `start`/`len` window rather than copying bytes, mirroring the
/// original's in-place pointer/length adjustment plus refcount bump.
#[derive(Clone)]
pub struct RcSpan {
    data: Rc<str>,
    start: usize,
    len: usize,
}

impl RcSpan {
    fn as_str(&self) -> &str {
        &self.data[self.start..self.start + self.len]
    }
}

/// The payload kinds a [`PBString::Join`] may hold on either side. A join
/// never nests another join — that invariant is enforced at construction
/// in [`PBString::concat`], not encoded in this type, since enforcing it
/// in the type itself would require either unsafe code or an indirection
/// the original doesn't have either.
#[derive(Clone)]
enum JoinPayload {
    Static(&'static str),
    RefCounted(RcSpan),
    Small(SmallStr),
}

impl JoinPayload {
    fn as_str(&self) -> &str {
        match self {
            JoinPayload::Static(s) => s,
            JoinPayload::RefCounted(r) => r.as_str(),
            JoinPayload::Small(s) => s.as_str(),
        }
    }

    fn len(&self) -> usize {
        self.as_str().len()
    }

    /// Lowers a non-`Join` `PBString` into a join side, bumping any
    /// inner ref count by cloning the `Rc`.
    fn from_pbstring(p: &PBString) -> JoinPayload {
        match p {
            PBString::Static(s) => JoinPayload::Static(s),
            PBString::RefCounted(r) => JoinPayload::RefCounted(r.clone()),
            PBString::Small(s) => JoinPayload::Small(*s),
            PBString::Join { .. } => unreachable!("a join side is never itself a join"),
        }
    }

    fn to_pbstring(&self) -> PBString {
        match self {
            JoinPayload::Static(s) => PBString::Static(s),
            JoinPayload::RefCounted(r) => PBString::RefCounted(r.clone()),
            JoinPayload::Small(s) => PBString::Small(*s),
        }
    }
}

/// The runtime's sole value type: a tagged union of four string
/// representations. See the module doc comment and `spec.md` §3/§4.6.
#[derive(Clone)]
pub enum PBString {
    /// Points into immutable, compiled-in text.
    Static(&'static str),
    /// A (possibly narrowed) view into a shared heap allocation.
    RefCounted(RcSpan),
    /// Short enough to live inline, no heap allocation at all.
    Small(SmallStr),
    /// A single-level concatenation of two non-`Join` payloads.
    Join {
        left: JoinPayload,
        right: JoinPayload,
    },
}

fn materialize(s: String) -> PBString {
    let len = s.len();
    PBString::RefCounted(RcSpan {
        data: Rc::from(s.into_boxed_str()),
        start: 0,
        len,
    })
}

impl PBString {
    /// The empty string. Represented as an empty `Small`, matching the
    /// original's default constructor.
    pub fn empty() -> Self {
        PBString::Small(SmallStr::from_str(""))
    }

    /// Wraps a `&'static str` without copying — the `STATIC` representation.
    pub fn from_static(s: &'static str) -> Self {
        PBString::Static(s)
    }

    pub fn true_value() -> Self {
        PBString::Static("TRUE")
    }

    pub fn false_value() -> Self {
        PBString::Static("FALSE")
    }

    /// Builds a runtime value from an owned `String`, choosing `Small`
    /// or `RefCounted` by length.
    pub fn from_owned(s: String) -> Self {
        if s.len() <= SMALL_MAX {
            PBString::Small(SmallStr::from_str(&s))
        } else {
            materialize(s)
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PBString::Static(s) => s.len(),
            PBString::RefCounted(r) => r.len,
            PBString::Small(s) => s.len as usize,
            PBString::Join { left, right } => left.len() + right.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The one or two raw spans backing this value. Two spans only for
    /// `Join`. Mirrors `PBString::GetRawStrings`/`GetLengths` — used
    /// directly by `Builtin_Print` so printing a join never has to
    /// materialize a concatenation first.
    pub fn raw_parts(&self) -> (&str, Option<&str>) {
        match self {
            PBString::Static(s) => (s, None),
            PBString::RefCounted(r) => (r.as_str(), None),
            PBString::Small(s) => (s.as_str(), None),
            PBString::Join { left, right } => (left.as_str(), Some(right.as_str())),
        }
    }

    /// A contiguous view of the full string. Borrowed for everything
    /// except `Join`, which must concatenate its two spans.
    ///
    /// This is a deliberate simplification relative to the original's
    /// piecewise `memcmp` comparison: as a test/reference mirror,
    /// correctness matters more here than avoiding the one allocation a
    /// `Join` comparison costs. The embedded C runtime (what emitted
    /// programs actually run) keeps the original's piecewise compare.
    fn flattened(&self) -> Cow<'_, str> {
        match self {
            PBString::Static(s) => Cow::Borrowed(s),
            PBString::RefCounted(r) => Cow::Borrowed(r.as_str()),
            PBString::Small(s) => Cow::Borrowed(s.as_str()),
            PBString::Join { left, right } => {
                let mut buf = String::with_capacity(left.len() + right.len());
                buf.push_str(left.as_str());
                buf.push_str(right.as_str());
                Cow::Owned(buf)
            }
        }
    }

    /// Concatenates two values in O(1) unless one side is already a
    /// `Join` (in which case the result is materialized to avoid
    /// nesting) or the combined length is small enough to inline.
    pub fn concat(a: &PBString, b: &PBString) -> PBString {
        if a.is_empty() {
            return b.clone();
        }
        if b.is_empty() {
            return a.clone();
        }
        let total = a.len() + b.len();
        if matches!(a, PBString::Join { .. }) || matches!(b, PBString::Join { .. }) {
            let mut buf = String::with_capacity(total);
            let (a1, a2) = a.raw_parts();
            buf.push_str(a1);
            if let Some(a2) = a2 {
                buf.push_str(a2);
            }
            let (b1, b2) = b.raw_parts();
            buf.push_str(b1);
            if let Some(b2) = b2 {
                buf.push_str(b2);
            }
            return materialize(buf);
        }
        if total <= SMALL_MAX {
            let mut buf = String::with_capacity(total);
            buf.push_str(a.raw_parts().0);
            buf.push_str(b.raw_parts().0);
            return PBString::Small(SmallStr::from_str(&buf));
        }
        PBString::Join {
            left: JoinPayload::from_pbstring(a),
            right: JoinPayload::from_pbstring(b),
        }
    }

    fn substring_non_join(&self, start: usize, end: usize) -> PBString {
        debug_assert!(start < end);
        match self {
            PBString::Static(s) => PBString::Static(&s[start..end]),
            PBString::RefCounted(r) => PBString::RefCounted(RcSpan {
                data: r.data.clone(),
                start: r.start + start,
                len: end - start,
            }),
            PBString::Small(s) => PBString::Small(SmallStr::from_str(&s.as_str()[start..end])),
            PBString::Join { .. } => unreachable!("substring_non_join called on a Join"),
        }
    }

    fn payload_substring(p: &JoinPayload, start: usize, end: usize) -> PBString {
        if start >= end {
            return PBString::empty();
        }
        p.to_pbstring().substring_non_join(start, end)
    }

    fn substring_of_join(
        left: &JoinPayload,
        right: &JoinPayload,
        start: usize,
        end: usize,
    ) -> PBString {
        let left_len = left.len();
        if end <= left_len {
            return Self::payload_substring(left, start, end);
        }
        if start >= left_len {
            return Self::payload_substring(right, start - left_len, end - left_len);
        }
        let new_len = end - start;
        if new_len <= SMALL_MAX {
            let mut buf = String::with_capacity(new_len);
            buf.push_str(&left.as_str()[start..left_len]);
            buf.push_str(&right.as_str()[0..end - left_len]);
            return PBString::Small(SmallStr::from_str(&buf));
        }
        let new_left = Self::payload_substring(left, start, left_len);
        let new_right = Self::payload_substring(right, 0, end - left_len);
        PBString::Join {
            left: JoinPayload::from_pbstring(&new_left),
            right: JoinPayload::from_pbstring(&new_right),
        }
    }

    /// Returns the substring `[start, end)`, clamping `end` to the
    /// string's length and returning empty when `start >= end`.
    pub fn substring(s: &PBString, start: usize, end: usize) -> PBString {
        let total = s.len();
        let end = end.min(total);
        if start >= end {
            return PBString::empty();
        }
        match s {
            PBString::Join { left, right } => Self::substring_of_join(left, right, start, end),
            _ => s.substring_non_join(start, end),
        }
    }

    /// Renders a `size_t`-ish length as a `PBString`, inline when it fits.
    pub fn size_to_string(size: usize) -> PBString {
        let s = size.to_string();
        if s.len() <= SMALL_MAX {
            PBString::Small(SmallStr::from_str(&s))
        } else {
            materialize(s)
        }
    }

    /// Attempts to parse this value as an unsigned size. Rejects empty
    /// strings, non-digit bytes, and strings with more than
    /// [`MAX_SIZE_DIGITS`] digits (matching `StringToSize`'s early-out
    /// rather than letting a huge digit string overflow `usize` silently).
    pub fn parse_as_size(&self) -> Option<usize> {
        let buf = self.flattened();
        if buf.is_empty() || buf.len() >= MAX_SIZE_DIGITS {
            return None;
        }
        if !buf.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        buf.parse::<usize>().ok()
    }

    pub fn is_true(&self) -> bool {
        *self == PBString::true_value()
    }
}

impl PartialEq for PBString {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.flattened() == other.flattened()
    }
}

impl Eq for PBString {}

impl std::fmt::Debug for PBString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PBString({:?})", self.flattened())
    }
}

/// Thin wrappers matching the eight free-function built-ins spec.md §4.6
/// lists (`Builtin_Equal`, `Builtin_Print`, ...). The evaluator's builtin
/// dispatch table (`crates/compiler/src/codegen/runtime.rs`) names the
/// target-language counterparts of exactly these.
pub mod builtins {
    use super::PBString;
    use std::io::{self, Write};

    pub fn equal(a: &PBString, b: &PBString) -> PBString {
        if a == b {
            PBString::true_value()
        } else {
            PBString::false_value()
        }
    }

    pub fn not(a: &PBString) -> PBString {
        if a.is_true() {
            PBString::false_value()
        } else {
            PBString::true_value()
        }
    }

    pub fn and(a: &PBString, b: &PBString) -> PBString {
        if a.is_true() && b.is_true() {
            PBString::true_value()
        } else {
            PBString::false_value()
        }
    }

    pub fn or(a: &PBString, b: &PBString) -> PBString {
        if a.is_true() || b.is_true() {
            PBString::true_value()
        } else {
            PBString::false_value()
        }
    }

    pub fn concat(a: &PBString, b: &PBString) -> PBString {
        PBString::concat(a, b)
    }

    pub fn strlen(a: &PBString) -> PBString {
        PBString::size_to_string(a.len())
    }

    pub fn substring(s: &PBString, start_str: &PBString, end_str: &PBString) -> PBString {
        let start = start_str.parse_as_size().unwrap_or(0);
        let end = end_str.parse_as_size().unwrap_or_else(|| s.len());
        PBString::substring(s, start, end)
    }

    /// Writes the value's bytes followed by a newline, then returns a
    /// clone of the value — `Builtin_Print` is an RValue in PoiBoi, not
    /// a void call, so callers may chain off its result.
    pub fn print(s: &PBString, out: &mut impl Write) -> io::Result<PBString> {
        let (first, second) = s.raw_parts();
        out.write_all(first.as_bytes())?;
        if let Some(second) = second {
            out.write_all(second.as_bytes())?;
        }
        out.write_all(b"\n")?;
        Ok(s.clone())
    }

    /// Convenience wrapper writing to stdout, as the emitted program does.
    pub fn print_stdout(s: &PBString) -> io::Result<PBString> {
        print(s, &mut io::stdout())
    }
}
