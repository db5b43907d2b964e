use core::mem::size_of;
use core::ptr::read_unaligned;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SliceReadError {
    UnexpectedEndOfInput,
}

pub(crate) type SliceReadResult<T> = Result<T, SliceReadError>;

pub(crate) trait SliceRead<'a> {
    fn read_be_u32(&self, pos: usize) -> SliceReadResult<u32>;
    fn read_bstring0(&self, pos: usize) -> SliceReadResult<&'a [u8]>;
}

impl<'a> SliceRead<'a> for &'a [u8] {
    #[inline]
    fn read_be_u32(&self, pos: usize) -> SliceReadResult<u32> {
        let end = pos
            .checked_add(size_of::<u32>())
            .ok_or(SliceReadError::UnexpectedEndOfInput)?;
        if end > self.len() {
            return Err(SliceReadError::UnexpectedEndOfInput);
        }

        // We explicitly read unaligned.
        #[allow(clippy::cast_ptr_alignment)]
        unsafe {
            Ok(u32::from_be(read_unaligned::<u32>(
                self.as_ptr().add(pos) as *const u32
            )))
        }
    }

    #[inline]
    fn read_bstring0(&self, pos: usize) -> SliceReadResult<&'a [u8]> {
        let tail = self.get(pos..).ok_or(SliceReadError::UnexpectedEndOfInput)?;
        match tail.iter().position(|&b| b == 0) {
            Some(len) => Ok(&tail[..len]),
            None => Err(SliceReadError::UnexpectedEndOfInput),
        }
    }
}

/// Round `off` up to the next 32-bit boundary.
#[inline]
pub(crate) const fn align_u32(off: usize) -> usize {
    (off + (size_of::<u32>() - 1)) & !(size_of::<u32>() - 1)
}
