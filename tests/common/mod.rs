//! Synthesises flattened device tree blobs for the integration tests.
#![allow(dead_code)]

pub const HEADER_SIZE: usize = 40;

pub const MAGIC: usize = 0;
pub const TOTALSIZE: usize = 4;
pub const OFF_DT_STRUCT: usize = 8;
pub const OFF_DT_STRINGS: usize = 12;
pub const OFF_MEM_RSVMAP: usize = 16;
pub const VERSION: usize = 20;
pub const LAST_COMP_VERSION: usize = 24;
pub const BOOT_CPUID_PHYS: usize = 28;
pub const SIZE_DT_STRINGS: usize = 32;
pub const SIZE_DT_STRUCT: usize = 36;

const FDT_BEGIN_NODE: u32 = 0x1;
const FDT_END_NODE: u32 = 0x2;
const FDT_PROP: u32 = 0x3;
const FDT_NOP: u32 = 0x4;
const FDT_END: u32 = 0x9;

/// Smallest totalsize accepted by validation.
const MIN_TOTALSIZE: usize = HEADER_SIZE + 128;

fn pad4(buf: &mut Vec<u8>) {
    while buf.len() % 4 != 0 {
        buf.push(0);
    }
}

/// Writes a big-endian header field in place.
pub fn poke(buf: &mut [u8], field: usize, value: u32) {
    buf[field..field + 4].copy_from_slice(&value.to_be_bytes());
}

pub fn peek(buf: &[u8], field: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&buf[field..field + 4]);
    u32::from_be_bytes(word)
}

#[derive(Default)]
pub struct FdtBuilder {
    structs: Vec<u8>,
    strings: Vec<u8>,
    names: Vec<(String, u32)>,
}

impl FdtBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn word(&mut self, w: u32) -> &mut Self {
        self.structs.extend_from_slice(&w.to_be_bytes());
        self
    }

    pub fn begin_node(&mut self, name: &str) -> &mut Self {
        self.word(FDT_BEGIN_NODE);
        self.structs.extend_from_slice(name.as_bytes());
        self.structs.push(0);
        pad4(&mut self.structs);
        self
    }

    pub fn end_node(&mut self) -> &mut Self {
        self.word(FDT_END_NODE)
    }

    pub fn nop(&mut self) -> &mut Self {
        self.word(FDT_NOP)
    }

    /// Offset of `name` in the strings block, adding it if needed.
    pub fn string(&mut self, name: &str) -> u32 {
        if let Some((_, off)) = self.names.iter().find(|(n, _)| n == name) {
            return *off;
        }
        let off = self.strings.len() as u32;
        self.strings.extend_from_slice(name.as_bytes());
        self.strings.push(0);
        self.names.push((name.to_string(), off));
        off
    }

    /// A property whose name offset is given verbatim.
    pub fn prop_at(&mut self, nameoff: u32, value: &[u8]) -> &mut Self {
        self.word(FDT_PROP);
        self.word(value.len() as u32);
        self.word(nameoff);
        self.structs.extend_from_slice(value);
        pad4(&mut self.structs);
        self
    }

    pub fn prop(&mut self, name: &str, value: &[u8]) -> &mut Self {
        let off = self.string(name);
        self.prop_at(off, value)
    }

    pub fn prop_str(&mut self, name: &str, value: &str) -> &mut Self {
        let mut bytes = value.as_bytes().to_vec();
        bytes.push(0);
        self.prop(name, &bytes)
    }

    pub fn prop_u32(&mut self, name: &str, value: u32) -> &mut Self {
        self.prop(name, &value.to_be_bytes())
    }

    /// The blob with a terminating END token.
    pub fn build(&mut self) -> Vec<u8> {
        self.word(FDT_END);
        let blob = self.build_raw();
        self.structs.truncate(self.structs.len() - 4);
        blob
    }

    /// The blob exactly as built so far.
    pub fn build_raw(&self) -> Vec<u8> {
        let off_mem_rsvmap = HEADER_SIZE;
        // One all-zero reservation entry terminates the map.
        let off_dt_struct = off_mem_rsvmap + 16;
        let off_dt_strings = off_dt_struct + self.structs.len();
        // Keep some slack after the strings block so its offset stays below totalsize.
        let totalsize = std::cmp::max(off_dt_strings + self.strings.len() + 8, MIN_TOTALSIZE);

        let mut blob = vec![0u8; totalsize];
        poke(&mut blob, MAGIC, 0xd00d_feed);
        poke(&mut blob, TOTALSIZE, totalsize as u32);
        poke(&mut blob, OFF_DT_STRUCT, off_dt_struct as u32);
        poke(&mut blob, OFF_DT_STRINGS, off_dt_strings as u32);
        poke(&mut blob, OFF_MEM_RSVMAP, off_mem_rsvmap as u32);
        poke(&mut blob, VERSION, 17);
        poke(&mut blob, LAST_COMP_VERSION, 16);
        poke(&mut blob, BOOT_CPUID_PHYS, 0);
        poke(&mut blob, SIZE_DT_STRINGS, self.strings.len() as u32);
        poke(&mut blob, SIZE_DT_STRUCT, self.structs.len() as u32);

        blob[off_dt_struct..off_dt_strings].copy_from_slice(&self.structs);
        blob[off_dt_strings..off_dt_strings + self.strings.len()].copy_from_slice(&self.strings);
        blob
    }
}

/// `/ { model = "test-board"; chosen { bootargs = "console=ttyS0"; }; }`
pub fn chosen_blob() -> Vec<u8> {
    FdtBuilder::new()
        .begin_node("")
        .prop_str("model", "test-board")
        .begin_node("chosen")
        .prop_str("bootargs", "console=ttyS0")
        .end_node()
        .end_node()
        .build()
}

/// A small board with a bus, two ethernet controllers and a deeper phy node.
pub fn board_blob() -> Vec<u8> {
    FdtBuilder::new()
        .begin_node("")
        .prop_str("compatible", "vendor,board")
        .prop_u32("#address-cells", 1)
        .begin_node("chosen")
        .prop_str("bootargs", "console=ttyS0,115200")
        .prop("rng-seed", &[0xde, 0xad, 0xbe, 0xef, 0x00, 0x01])
        .end_node()
        .begin_node("soc")
        .prop_u32("#size-cells", 1)
        .begin_node("ethernet@1000")
        .prop_u32("reg", 0x1000)
        .prop("local-mac-address", &[0x02, 0x00, 0x00, 0x00, 0x00, 0x01])
        .begin_node("phy@0")
        .prop_u32("phandle", 0xffff_ffff)
        .end_node()
        .end_node()
        .begin_node("ethernet@2000")
        .prop_u32("reg", 0x2000)
        .prop_str("status", "disabled")
        .end_node()
        .nop()
        .begin_node("serial@3000")
        .prop_u32("reg", 0x3000)
        .prop("empty", &[])
        .prop("unterminated", b"abc")
        .prop("clock-frequency", &[0, 0, 0x1c, 0x20, 0, 0, 0, 0])
        .end_node()
        .end_node()
        .end_node()
        .build()
}
