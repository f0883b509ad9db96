use std::io::{self, Read, Seek, SeekFrom};

const EOCD_SIGNATURE: u32 = 0x0605_4b50;
const ZIP64_LOCATOR_SIGNATURE: u32 = 0x0706_4b50;
const ZIP64_EOCD_SIGNATURE: u32 = 0x0606_4b50;

/// Fixed part of the end-of-central-directory record
const EOCD_LEN: usize = 22;
const ZIP64_LOCATOR_LEN: usize = 20;
const ZIP64_EOCD_LEN: usize = 56;
const MAX_COMMENT_LEN: usize = u16::MAX as usize;

/// Number of entries the archive's end-of-central-directory record
/// declares, duplicates included.
///
/// Leaves the reader at an unspecified position.
pub fn declared_entry_count<R: Read + Seek>(reader: &mut R) -> io::Result<u64> {
    let file_len = reader.seek(SeekFrom::End(0))?;
    let window = file_len.min((EOCD_LEN + MAX_COMMENT_LEN) as u64);
    reader.seek(SeekFrom::Start(file_len - window))?;
    let mut tail = vec![0u8; window as usize];
    reader.read_exact(&mut tail)?;

    if tail.len() < EOCD_LEN {
        return Err(invalid("archive too short for an end-of-central-directory record"));
    }

    let eocd = (0..=tail.len() - EOCD_LEN)
        .rev()
        .find(|&i| read_u32(&tail[i..]) == EOCD_SIGNATURE)
        .ok_or_else(|| invalid("end-of-central-directory record not found"))?;

    let total = read_u16(&tail[eocd + 10..]);
    if total != u16::MAX {
        return Ok(u64::from(total));
    }

    // Saturated count: the real one lives in the zip64 record
    if eocd < ZIP64_LOCATOR_LEN {
        return Ok(u64::from(total));
    }
    let locator = &tail[eocd - ZIP64_LOCATOR_LEN..eocd];
    if read_u32(locator) != ZIP64_LOCATOR_SIGNATURE {
        return Ok(u64::from(total));
    }

    let zip64_offset = read_u64(&locator[8..]);
    reader.seek(SeekFrom::Start(zip64_offset))?;
    let mut record = [0u8; ZIP64_EOCD_LEN];
    reader.read_exact(&mut record)?;
    if read_u32(&record) != ZIP64_EOCD_SIGNATURE {
        return Err(invalid("zip64 end-of-central-directory record not found"));
    }

    Ok(read_u64(&record[32..]))
}

fn invalid(message: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.to_string())
}

fn read_u16(bytes: &[u8]) -> u16 {
    u16::from_le_bytes([bytes[0], bytes[1]])
}

fn read_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(buf)
}
