//! Mach-O export trie.
//!
//! A radix tree over exported symbol names. Terminal nodes carry the
//! export flags and the symbol's vmaddr offset. The serialized form stores
//! each node's children as NUL-terminated edge labels followed by the
//! ULEB128 byte offset of the child node, which makes the layout
//! self-referential: an offset's encoded width can change the offsets of
//! everything behind it, so [`Trie::finalize`] iterates the layout to a
//! fixed point before [`Trie::write`] is allowed.

use std::collections::VecDeque;

use thiserror::Error;
use tracing::debug;

pub const EXPORT_SYMBOL_FLAGS_REEXPORT: u64 = 0x08;
pub const EXPORT_SYMBOL_FLAGS_STUB_AND_RESOLVER: u64 = 0x10;

const UNSUPPORTED_FLAGS: u64 = EXPORT_SYMBOL_FLAGS_REEXPORT | EXPORT_SYMBOL_FLAGS_STUB_AND_RESOLVER;

/// One symbol to insert into the trie.
pub struct ExportSymbol<'a> {
    pub name: &'a [u8],
    pub vmaddr_offset: u64,
    pub export_flags: u64,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TerminalInfo {
    pub vmaddr_offset: u64,
    pub export_flags: u64,
}

struct Edge {
    label: Vec<u8>,
    child: Box<Node>,
}

#[derive(Default)]
struct Node {
    terminal: Option<TerminalInfo>,
    edges: Vec<Edge>,
    /// Byte offset in the serialized stream; valid once finalized.
    trie_offset: u64,
}

#[derive(Debug, Error)]
pub enum TrieError {
    #[error("unexpected end of stream")]
    UnexpectedEndOfStream,
    #[error("ULEB128 value does not fit in 64 bits")]
    UlebOverflow,
    #[error("edge label is not NUL-terminated")]
    UnterminatedLabel,
    #[error("edge offset {0} points outside the stream")]
    BadChildOffset(u64),
}

pub struct Trie {
    root: Box<Node>,
    node_count: usize,
    size: u64,
    dirty: bool,
}

impl Default for Trie {
    fn default() -> Trie {
        Trie::new()
    }
}

impl Trie {
    pub fn new() -> Trie {
        Trie {
            root: Box::default(),
            node_count: 1,
            size: 0,
            dirty: true,
        }
    }

    /// Total number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Serialized size in bytes; valid once finalized.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Insert a symbol, splicing edges as needed. Inserting the same name
    /// again only overwrites the terminal payload.
    pub fn put(&mut self, symbol: ExportSymbol) {
        let node = self.root.put(symbol.name, &mut self.node_count);
        node.terminal = Some(TerminalInfo {
            vmaddr_offset: symbol.vmaddr_offset,
            export_flags: symbol.export_flags,
        });
        self.dirty = true;
    }

    /// Look up a name walking edge labels.
    pub fn get(&self, name: &[u8]) -> Option<TerminalInfo> {
        let mut node = &*self.root;
        let mut rest = name;
        'walk: loop {
            if rest.is_empty() {
                return node.terminal;
            }
            for edge in &node.edges {
                if rest.starts_with(&edge.label) {
                    rest = &rest[edge.label.len()..];
                    node = &edge.child;
                    continue 'walk;
                }
            }
            return None;
        }
    }

    /// Assign a byte offset to every node, in breadth-first order. A
    /// node's size depends on the ULEB128 widths of its children's
    /// offsets, so passes repeat until no node moves; offsets only ever
    /// grow and their encodable widths are bounded, so this terminates.
    pub fn finalize(&mut self) {
        if !self.dirty {
            return;
        }
        let mut passes = 0u32;
        loop {
            passes += 1;
            let mut offset: u64 = 0;
            let mut moved = false;
            let mut queue: VecDeque<&mut Node> = VecDeque::new();
            queue.push_back(&mut *self.root);
            while let Some(node) = queue.pop_front() {
                if node.trie_offset != offset {
                    node.trie_offset = offset;
                    moved = true;
                }
                offset += node.serialized_size();
                for edge in &mut node.edges {
                    queue.push_back(&mut *edge.child);
                }
            }
            if !moved {
                self.size = offset;
                break;
            }
        }
        self.dirty = false;
        debug!(
            passes,
            nodes = self.node_count,
            bytes = self.size,
            "export trie layout converged"
        );
    }

    /// Serialize into `out`, returning the number of bytes written. The
    /// trie must be finalized and untouched since.
    pub fn write(&self, out: &mut Vec<u8>) -> u64 {
        assert!(!self.dirty, "export trie written without finalize");
        let base = out.len();
        let mut queue: VecDeque<&Node> = VecDeque::new();
        queue.push_back(&*self.root);
        while let Some(node) = queue.pop_front() {
            debug_assert_eq!((out.len() - base) as u64, node.trie_offset);
            node.write(out);
            for edge in &node.edges {
                queue.push_back(&*edge.child);
            }
        }
        (out.len() - base) as u64
    }

    /// Parse a serialized trie. The result is dirty: offsets are only
    /// meaningful again after a `finalize`.
    pub fn read(data: &[u8]) -> Result<Trie, TrieError> {
        let mut reader = Reader { data, pos: 0 };
        let mut node_count = 0;
        let root = read_node(&mut reader, &mut node_count)?;
        Ok(Trie {
            root,
            node_count,
            size: 0,
            dirty: true,
        })
    }
}

impl Node {
    /// Descend to the node for `label`, creating or splicing as needed.
    fn put(&mut self, label: &[u8], node_count: &mut usize) -> &mut Node {
        if label.is_empty() {
            return self;
        }

        let mut found = None;
        for (index, edge) in self.edges.iter().enumerate() {
            let common = common_prefix_len(&edge.label, label);
            if common > 0 {
                found = Some((index, common));
                break;
            }
        }
        let Some((index, common)) = found else {
            // No edge shares a prefix; append a fresh leaf.
            *node_count += 1;
            self.edges.push(Edge {
                label: label.to_vec(),
                child: Box::default(),
            });
            assert!(self.edges.len() <= u8::MAX as usize);
            return &mut *self.edges.last_mut().unwrap().child;
        };

        if common == self.edges[index].label.len() {
            // The edge label is a prefix of ours; continue below it.
            return self.edges[index].child.put(&label[common..], node_count);
        }

        // Partial match: splice in a mid node carrying the shared prefix,
        // re-parenting the old child under its remaining suffix.
        *node_count += 1;
        let edge = &mut self.edges[index];
        let old_suffix = edge.label.split_off(common);
        let old_child = std::mem::replace(&mut edge.child, Box::default());
        edge.child.edges.push(Edge {
            label: old_suffix,
            child: old_child,
        });
        // The remainders diverge, so this either returns the mid node
        // (exhausted label) or hangs a new leaf off it.
        edge.child.put(&label[common..], node_count)
    }

    /// Size in the stream, using the children's current offsets.
    fn serialized_size(&self) -> u64 {
        let mut size = match self.terminal {
            Some(info) => {
                let info_size = uleb128_len(info.export_flags) + uleb128_len(info.vmaddr_offset);
                uleb128_len(info_size) + info_size
            }
            None => 1,
        };
        size += 1; // edge count
        for edge in &self.edges {
            size += edge.label.len() as u64 + 1 + uleb128_len(edge.child.trie_offset);
        }
        size
    }

    fn write(&self, out: &mut Vec<u8>) {
        match self.terminal {
            Some(info) => {
                assert_eq!(
                    info.export_flags & UNSUPPORTED_FLAGS,
                    0,
                    "REEXPORT and STUB_AND_RESOLVER exports are not supported"
                );
                let info_size = uleb128_len(info.export_flags) + uleb128_len(info.vmaddr_offset);
                write_uleb128(out, info_size);
                write_uleb128(out, info.export_flags);
                write_uleb128(out, info.vmaddr_offset);
            }
            None => out.push(0),
        }
        debug_assert!(self.edges.len() <= u8::MAX as usize);
        out.push(self.edges.len() as u8);
        for edge in &self.edges {
            out.extend_from_slice(&edge.label);
            out.push(0);
            write_uleb128(out, edge.child.trie_offset);
        }
    }
}

fn read_node(reader: &mut Reader, node_count: &mut usize) -> Result<Box<Node>, TrieError> {
    *node_count += 1;
    let terminal_size = reader.read_uleb128()?;
    let terminal = if terminal_size != 0 {
        let export_flags = reader.read_uleb128()?;
        assert_eq!(
            export_flags & UNSUPPORTED_FLAGS,
            0,
            "REEXPORT and STUB_AND_RESOLVER exports are not supported"
        );
        let vmaddr_offset = reader.read_uleb128()?;
        Some(TerminalInfo {
            vmaddr_offset,
            export_flags,
        })
    } else {
        None
    };
    let edge_count = reader.read_byte()?;
    let mut edges = Vec::with_capacity(edge_count as usize);
    for _ in 0..edge_count {
        let label = reader.read_label()?;
        let child_offset = reader.read_uleb128()?;
        let resume = reader.pos;
        reader.seek_to(child_offset)?;
        let child = read_node(reader, node_count)?;
        reader.pos = resume;
        edges.push(Edge { label, child });
    }
    Ok(Box::new(Node {
        terminal,
        edges,
        trie_offset: 0,
    }))
}

struct Reader<'data> {
    data: &'data [u8],
    pos: usize,
}

impl Reader<'_> {
    fn read_byte(&mut self) -> Result<u8, TrieError> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or(TrieError::UnexpectedEndOfStream)?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_uleb128(&mut self) -> Result<u64, TrieError> {
        let mut value: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            let byte = self.read_byte()?;
            if shift > 63 || (shift == 63 && byte & 0x7f > 1) {
                return Err(TrieError::UlebOverflow);
            }
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    }

    /// A NUL-terminated edge label; the terminator is consumed.
    fn read_label(&mut self) -> Result<Vec<u8>, TrieError> {
        let start = self.pos;
        let len = self.data[start..]
            .iter()
            .position(|&byte| byte == 0)
            .ok_or(TrieError::UnterminatedLabel)?;
        self.pos = start + len + 1;
        Ok(self.data[start..start + len].to_vec())
    }

    fn seek_to(&mut self, pos: u64) -> Result<(), TrieError> {
        if pos as usize >= self.data.len() {
            return Err(TrieError::BadChildOffset(pos));
        }
        self.pos = pos as usize;
        Ok(())
    }
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn uleb128_len(mut value: u64) -> u64 {
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1;
    }
    len
}

fn write_uleb128(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            break;
        }
        out.push(byte | 0x80);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str, vmaddr_offset: u64) -> ExportSymbol<'_> {
        ExportSymbol {
            name: name.as_bytes(),
            vmaddr_offset,
            export_flags: 0,
        }
    }

    #[test]
    fn empty_trie_is_a_childless_root() {
        let mut trie = Trie::new();
        trie.finalize();
        let mut out = Vec::new();
        assert_eq!(trie.write(&mut out), 2);
        assert_eq!(out, [0x00, 0x00]);
    }

    #[test]
    fn reinsert_does_not_grow() {
        let mut trie = Trie::new();
        trie.put(sym("_main", 0x1000));
        let count = trie.node_count();
        trie.put(sym("_main", 0x2000));
        assert_eq!(trie.node_count(), count);
        assert_eq!(trie.get(b"_main").unwrap().vmaddr_offset, 0x2000);
    }

    #[test]
    fn prefix_insert_extends_with_one_node() {
        let mut trie = Trie::new();
        trie.put(sym("_st", 0x0));
        assert_eq!(trie.node_count(), 2);
        trie.put(sym("_start", 0x10));
        assert_eq!(trie.node_count(), 3);
        assert_eq!(trie.get(b"_st").unwrap().vmaddr_offset, 0x0);
        assert_eq!(trie.get(b"_start").unwrap().vmaddr_offset, 0x10);
    }

    #[test]
    fn splice_on_shared_prefix() {
        let mut trie = Trie::new();
        trie.put(sym("_start", 0x10));
        assert_eq!(trie.node_count(), 2);
        // Shorter name splits the existing edge; the mid node is the
        // terminal.
        trie.put(sym("_st", 0x0));
        assert_eq!(trie.node_count(), 3);
        assert_eq!(trie.get(b"_st").unwrap().vmaddr_offset, 0x0);
        assert_eq!(trie.get(b"_start").unwrap().vmaddr_offset, 0x10);
        assert_eq!(trie.get(b"_s"), None);
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut trie = Trie::new();
        trie.put(sym("__mh_execute_header", 0x0));
        trie.put(sym("_main", 0x1000));
        trie.finalize();
        let size = trie.size();
        let mut first = Vec::new();
        trie.write(&mut first);

        trie.finalize();
        assert_eq!(trie.size(), size);
        let mut second = Vec::new();
        trie.write(&mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn known_two_symbol_stream() {
        let mut trie = Trie::new();
        trie.put(sym("__mh_execute_header", 0x0));
        trie.put(sym("_main", 0x1000));
        trie.finalize();

        let mut out = Vec::new();
        let written = trie.write(&mut out);
        assert_eq!(written, trie.size());
        let expected: [u8; 42] = [
            0x00, 0x01, 0x5F, 0x00, 0x05, 0x00, 0x02, 0x5F, 0x6D, 0x68, 0x5F, 0x65, 0x78, 0x65,
            0x63, 0x75, 0x74, 0x65, 0x5F, 0x68, 0x65, 0x61, 0x64, 0x65, 0x72, 0x00, 0x21, 0x6D,
            0x61, 0x69, 0x6E, 0x00, 0x25, 0x02, 0x00, 0x00, 0x00, 0x03, 0x00, 0x80, 0x20, 0x00,
        ];
        assert_eq!(out, expected);
    }

    #[test]
    fn round_trip_is_byte_identical() {
        let mut trie = Trie::new();
        for (name, addr) in [
            ("__mh_execute_header", 0x0u64),
            ("_main", 0x1000),
            ("_malloc", 0x2000),
            ("_malloc_usable_size", 0x2040),
            ("_free", 0x3000),
            ("_freopen", 0x3100),
        ] {
            trie.put(sym(name, addr));
        }
        trie.finalize();
        let mut first = Vec::new();
        trie.write(&mut first);

        let mut reread = Trie::read(&first).unwrap();
        assert_eq!(reread.node_count(), trie.node_count());
        reread.finalize();
        let mut second = Vec::new();
        reread.write(&mut second);
        assert_eq!(first, second);

        assert_eq!(reread.get(b"_malloc").unwrap().vmaddr_offset, 0x2000);
        assert_eq!(reread.get(b"_mal"), None);
    }

    #[test]
    fn read_rejects_truncated_stream() {
        let mut trie = Trie::new();
        trie.put(sym("_main", 0x1000));
        trie.finalize();
        let mut out = Vec::new();
        trie.write(&mut out);
        out.truncate(out.len() - 1);
        assert!(Trie::read(&out).is_err());
    }

    #[test]
    #[should_panic(expected = "not supported")]
    fn write_rejects_reexport_flag() {
        let mut trie = Trie::new();
        trie.put(ExportSymbol {
            name: b"_reexported",
            vmaddr_offset: 0,
            export_flags: EXPORT_SYMBOL_FLAGS_REEXPORT,
        });
        trie.finalize();
        let mut out = Vec::new();
        trie.write(&mut out);
    }
}
