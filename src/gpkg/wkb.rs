//! GeoPackage geometry blob decoding.
//!
//! A blob is a GeoPackage binary envelope wrapped around a Well-Known-Binary
//! body (<https://www.geopackage.org/spec131/index.html#gpb_spec>): a 2-byte
//! magic, a version byte, a flag byte, the spatial reference id, an optional
//! envelope whose size the flag byte selects, and then standard WKB with its
//! own per-blob endianness.
//!
//! Decoding fails fast: a truncated buffer, wrong magic/version or an
//! unsupported geometry type code never yields a partial geometry. The
//! matching encoder exists for fixture construction and round-trip tests.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use tracing::debug;

use crate::error::{Error, Result};
use crate::geom::types::{Geometry, LineString, LinearRing, Point, PointZ, Polygon};

const MAGIC: [u8; 2] = *b"GP";

const WKB_POINT: u32 = 1;
const WKB_POLYGON: u32 = 3;
const WKB_POINT_Z: u32 = 1001;
const WKB_LINE_STRING_Z: u32 = 1002;
const WKB_POLYGON_Z: u32 = 1003;

/// Envelope byte sizes by contents indicator code. Codes 5-7 are invalid.
const ENVELOPE_SIZES: [usize; 5] = [0, 32, 48, 48, 64];

/// Byte order of a WKB body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WkbOrder {
    Big,
    Little,
}

/// Bounds-checked reader over a byte buffer.
struct Cursor<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8], offset: usize) -> Self {
        Cursor { buf, offset }
    }

    fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.offset)
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8]> {
        if self.remaining() < needed {
            return Err(Error::Truncated {
                offset: self.offset,
                needed,
                len: self.buf.len(),
            });
        }
        let bytes = &self.buf[self.offset..self.offset + needed];
        self.offset += needed;
        Ok(bytes)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_i32(&mut self, order: WkbOrder) -> Result<i32> {
        let bytes = self.take(4)?;
        Ok(match order {
            WkbOrder::Big => BigEndian::read_i32(bytes),
            WkbOrder::Little => LittleEndian::read_i32(bytes),
        })
    }

    fn read_u32(&mut self, order: WkbOrder) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(match order {
            WkbOrder::Big => BigEndian::read_u32(bytes),
            WkbOrder::Little => LittleEndian::read_u32(bytes),
        })
    }

    fn read_f64(&mut self, order: WkbOrder) -> Result<f64> {
        let bytes = self.take(8)?;
        Ok(match order {
            WkbOrder::Big => BigEndian::read_f64(bytes),
            WkbOrder::Little => LittleEndian::read_f64(bytes),
        })
    }
}

/// Decodes a full GeoPackage blob (envelope header plus WKB body).
pub fn decode_gpkg_blob(blob: &[u8]) -> Result<Geometry> {
    let mut cursor = Cursor::new(blob, 0);

    let magic = cursor.take(2)?;
    if magic != MAGIC {
        return Err(Error::BadMagic([magic[0], magic[1]]));
    }

    let version = cursor.read_u8()?;
    if version != 0 {
        return Err(Error::UnsupportedVersion(version));
    }

    let flags = cursor.read_u8()?;
    let header_order = if flags & 0b0000_0001 != 0 {
        WkbOrder::Little
    } else {
        WkbOrder::Big
    };
    let srs_id = cursor.read_i32(header_order)?;

    let indicator = (flags >> 1) & 0b111;
    let envelope_size = *ENVELOPE_SIZES
        .get(indicator as usize)
        .ok_or(Error::InvalidEnvelope(indicator))?;
    cursor.take(envelope_size)?;

    debug!(srs_id, indicator, "decoded GeoPackage envelope header");

    let (_, geometry) = decode_wkb(blob, cursor.offset)?;
    Ok(geometry)
}

/// Decodes a WKB body starting at `offset`, returning the offset of the
/// first byte past the geometry together with the geometry itself.
pub fn decode_wkb(buf: &[u8], offset: usize) -> Result<(usize, Geometry)> {
    let mut cursor = Cursor::new(buf, offset);

    let order = match cursor.read_u8()? {
        0 => WkbOrder::Big,
        1 => WkbOrder::Little,
        other => return Err(Error::InvalidByteOrder(other)),
    };
    let type_code = cursor.read_u32(order)?;

    let geometry = match type_code {
        WKB_POINT => Geometry::Point(read_point(&mut cursor, order)?),
        WKB_POINT_Z => Geometry::PointZ(read_point_z(&mut cursor, order)?),
        WKB_LINE_STRING_Z => Geometry::LineString(LineString {
            points: read_points(&mut cursor, order, true)?,
        }),
        WKB_POLYGON => Geometry::Polygon(read_polygon(&mut cursor, order, false)?),
        WKB_POLYGON_Z => Geometry::Polygon(read_polygon(&mut cursor, order, true)?),
        code => {
            return Err(Error::UnsupportedGeometryType {
                code,
                blob_hex: hex_string(buf),
            })
        }
    };

    Ok((cursor.offset, geometry))
}

fn read_point(cursor: &mut Cursor, order: WkbOrder) -> Result<Point> {
    let x = cursor.read_f64(order)?;
    let y = cursor.read_f64(order)?;
    Ok(Point { x, y })
}

fn read_point_z(cursor: &mut Cursor, order: WkbOrder) -> Result<PointZ> {
    let x = cursor.read_f64(order)?;
    let y = cursor.read_f64(order)?;
    let z = cursor.read_f64(order)?;
    Ok(PointZ { x, y, z })
}

/// Reads a length-prefixed run of flattened coordinate tuples (the shared
/// layout of line strings and linear rings).
fn read_points(cursor: &mut Cursor, order: WkbOrder, has_z: bool) -> Result<Vec<PointZ>> {
    let count = cursor.read_u32(order)? as usize;
    let floats_per_point = if has_z { 3 } else { 2 };

    // Validate against the remaining buffer before allocating so a corrupt
    // count fails as a truncation, not an allocation.
    let needed = count
        .checked_mul(floats_per_point * 8)
        .ok_or(Error::Truncated {
            offset: cursor.offset,
            needed: usize::MAX,
            len: cursor.buf.len(),
        })?;
    if cursor.remaining() < needed {
        return Err(Error::Truncated {
            offset: cursor.offset,
            needed,
            len: cursor.buf.len(),
        });
    }

    let mut points = Vec::with_capacity(count);
    for _ in 0..count {
        let x = cursor.read_f64(order)?;
        let y = cursor.read_f64(order)?;
        let z = if has_z { cursor.read_f64(order)? } else { 0.0 };
        points.push(PointZ { x, y, z });
    }
    Ok(points)
}

fn read_polygon(cursor: &mut Cursor, order: WkbOrder, has_z: bool) -> Result<Polygon> {
    let ring_count = cursor.read_u32(order)? as usize;
    let mut rings = Vec::with_capacity(ring_count.min(64));
    for _ in 0..ring_count {
        rings.push(LinearRing {
            points: read_points(cursor, order, has_z)?,
        });
    }
    Ok(Polygon { rings })
}

fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Encodes a geometry as a WKB body. The inverse of [`decode_wkb`] for the
/// supported type codes; 2D polygons re-encode as their Z variant with the
/// zero elevation they decoded with.
pub fn encode_wkb(geometry: &Geometry, order: WkbOrder) -> Vec<u8> {
    let mut out = Vec::new();
    out.push(match order {
        WkbOrder::Big => 0u8,
        WkbOrder::Little => 1u8,
    });

    match geometry {
        Geometry::Point(p) => {
            put_u32(&mut out, WKB_POINT, order);
            put_f64(&mut out, p.x, order);
            put_f64(&mut out, p.y, order);
        }
        Geometry::PointZ(p) => {
            put_u32(&mut out, WKB_POINT_Z, order);
            put_f64(&mut out, p.x, order);
            put_f64(&mut out, p.y, order);
            put_f64(&mut out, p.z, order);
        }
        Geometry::LineString(line) => {
            put_u32(&mut out, WKB_LINE_STRING_Z, order);
            put_points(&mut out, &line.points, order);
        }
        Geometry::Polygon(polygon) => {
            put_u32(&mut out, WKB_POLYGON_Z, order);
            put_u32(&mut out, polygon.rings.len() as u32, order);
            for ring in &polygon.rings {
                put_points(&mut out, &ring.points, order);
            }
        }
    }

    out
}

/// Encodes a geometry as a full GeoPackage blob with an empty envelope
/// (contents indicator 0) and a little-endian header.
pub fn encode_gpkg_blob(geometry: &Geometry, srs_id: i32) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&MAGIC);
    out.push(0); // version
    out.push(0b0000_0001); // no envelope, little-endian header
    out.extend_from_slice(&srs_id.to_le_bytes());
    out.extend_from_slice(&encode_wkb(geometry, WkbOrder::Little));
    out
}

fn put_u32(out: &mut Vec<u8>, value: u32, order: WkbOrder) {
    match order {
        WkbOrder::Big => out.extend_from_slice(&value.to_be_bytes()),
        WkbOrder::Little => out.extend_from_slice(&value.to_le_bytes()),
    }
}

fn put_f64(out: &mut Vec<u8>, value: f64, order: WkbOrder) {
    match order {
        WkbOrder::Big => out.extend_from_slice(&value.to_be_bytes()),
        WkbOrder::Little => out.extend_from_slice(&value.to_le_bytes()),
    }
}

fn put_points(out: &mut Vec<u8>, points: &[PointZ], order: WkbOrder) {
    put_u32(out, points.len() as u32, order);
    for p in points {
        put_f64(out, p.x, order);
        put_f64(out, p.y, order);
        put_f64(out, p.z, order);
    }
}
