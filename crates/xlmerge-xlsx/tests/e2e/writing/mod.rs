//! Writing tests - write a workbook, read it back, compare.

mod round_trip;
