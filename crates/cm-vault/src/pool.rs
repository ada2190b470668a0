/// Shared, non-secret random bytes the identity blocks are cut from
pub const IDENTITY_POOL: [u8; 384] = [
    0xa0, 0x80, 0x32, 0xff, 0xee, 0x3c, 0x06, 0x8f, 0xec, 0x24, 0x32, 0x1d,
    0x95, 0x90, 0xe6, 0x3e, 0xd4, 0x9b, 0xd6, 0x05, 0xe6, 0x21, 0x51, 0xd0,
    0xb0, 0x3c, 0x99, 0x5d, 0x93, 0xc1, 0x4a, 0x7a, 0xae, 0x0a, 0x99, 0x74,
    0x3d, 0x4c, 0xb0, 0x3e, 0xa8, 0x82, 0xb5, 0xcf, 0x72, 0x64, 0x8d, 0x59,
    0xfe, 0x50, 0xce, 0x82, 0x6e, 0xa6, 0x7b, 0x98, 0x5e, 0xef, 0x57, 0x29,
    0xa7, 0xa9, 0x7a, 0xcb, 0x47, 0xde, 0x4a, 0x71, 0x0a, 0x8b, 0x09, 0x3e,
    0x37, 0x48, 0xc2, 0xf4, 0xff, 0xbd, 0xc4, 0x35, 0x9f, 0x5f, 0x49, 0xba,
    0x42, 0xa1, 0x25, 0x22, 0x63, 0x1f, 0x41, 0x9d, 0x00, 0xbd, 0x2f, 0x60,
    0xfe, 0x19, 0xa5, 0xc6, 0xba, 0x1b, 0x5d, 0x11, 0x1a, 0xd0, 0xb5, 0xf0,
    0x73, 0x42, 0xa7, 0x64, 0xe8, 0xfb, 0x24, 0xb4, 0xb7, 0x81, 0xde, 0x43,
    0x2f, 0xb6, 0x66, 0x80, 0xab, 0xab, 0x96, 0x44, 0x11, 0x05, 0xfa, 0xc1,
    0x56, 0x0a, 0x41, 0x7d, 0xb9, 0x34, 0xe2, 0x11, 0xd5, 0x1f, 0x54, 0x4c,
    0xda, 0xab, 0x51, 0x8f, 0x49, 0x6a, 0x9e, 0x22, 0x98, 0x6f, 0x4e, 0x90,
    0xd3, 0x8a, 0xcb, 0xc0, 0x64, 0xcc, 0x11, 0x87, 0xa7, 0x97, 0xab, 0xe8,
    0x2a, 0xbf, 0x1e, 0xc7, 0xb9, 0xfd, 0x80, 0x17, 0xb5, 0x81, 0xc2, 0x35,
    0xf5, 0x2e, 0x91, 0xaf, 0xd8, 0xbd, 0x79, 0xce, 0x21, 0x5b, 0x31, 0x1e,
    0xde, 0xa9, 0x38, 0x3a, 0x85, 0x44, 0x43, 0x2e, 0x10, 0xb5, 0x66, 0x80,
    0xff, 0x47, 0x6a, 0x25, 0x48, 0xd7, 0x90, 0xfe, 0x59, 0xce, 0x15, 0x05,
    0xf3, 0xd9, 0xfa, 0xf8, 0xf1, 0x8f, 0xe7, 0x76, 0xbb, 0x36, 0x2a, 0xb4,
    0x84, 0x7f, 0xbd, 0xc6, 0x2a, 0x1f, 0xbd, 0xf3, 0x9f, 0x4c, 0x0c, 0xa6,
    0xb5, 0xc3, 0xbb, 0xf3, 0x50, 0xb5, 0x2c, 0x27, 0x29, 0xd1, 0x5a, 0x88,
    0x4c, 0x21, 0x5f, 0x88, 0xd4, 0xbb, 0xe9, 0x07, 0xb6, 0x7a, 0x49, 0xca,
    0x79, 0xd9, 0x4c, 0xa2, 0x7d, 0x4d, 0x62, 0x3e, 0xef, 0x31, 0x9c, 0x03,
    0x4f, 0xc5, 0x51, 0x64, 0x1f, 0x20, 0x2c, 0x44, 0x0d, 0x76, 0x6c, 0x87,
    0x2b, 0xa0, 0x91, 0x33, 0xae, 0x4a, 0x15, 0xbc, 0xd7, 0xda, 0x82, 0xbf,
    0xc8, 0xbc, 0x5a, 0x3b, 0x24, 0xdc, 0xaf, 0xfe, 0xe6, 0x16, 0x05, 0x33,
    0x14, 0x71, 0xbc, 0xab, 0x9c, 0x5b, 0xbd, 0xfd, 0x2d, 0xcf, 0x3a, 0xcf,
    0xdf, 0x84, 0xe2, 0x8e, 0x2d, 0x74, 0x29, 0xf6, 0x78, 0x6c, 0x84, 0xab,
    0x6e, 0xa6, 0x32, 0x17, 0xab, 0xbd, 0x33, 0xdf, 0x21, 0x23, 0xb4, 0xdc,
    0xd1, 0xd0, 0x90, 0x8d, 0x0e, 0xfe, 0xb8, 0x0b, 0x41, 0x56, 0x45, 0xfe,
    0x6c, 0xa8, 0x3f, 0x60, 0xa3, 0x04, 0x04, 0x60, 0x3f, 0xb5, 0x85, 0xf4,
    0x78, 0xc3, 0x3d, 0x12, 0x4e, 0xc7, 0x2f, 0x05, 0xfe, 0xd6, 0x74, 0xfe,
];
