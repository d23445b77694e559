//! Nonblocking syscall adapters.
//!
//! Every function here assumes the file descriptor has already been put in
//! nonblocking mode and hands the kernel a pointer straight into the iobuf's
//! window, so no intermediate copy is made. On success the window's lower
//! edge advances by the transferred byte count; reads land in `[lo, hi)`,
//! writes drain `[lo, hi)`.
//!
//! Errors are the raw `std::io::Error` from the syscall, untransformed:
//! `EAGAIN` surfaces as `ErrorKind::WouldBlock` and is not special-cased,
//! and `EINTR` is exposed so the caller owns its retry policy.
//!
//! `recvmmsg` and the `MSG_NOSIGNAL` sends only exist where the platform
//! provides the primitive; [`recvmmsg_available`] and
//! [`no_sigpipe_available`] report support uniformly on every platform.

use std::io;
use std::mem;
use std::os::unix::io::AsRawFd;

use socket2::SockAddr;

use crate::marker::{Access, ReadWrite, Seek};
use crate::Iobuf;

/// Reads into the window, advancing `lo` by the bytes read.
pub fn read(fd: &impl AsRawFd, t: &mut Iobuf<ReadWrite, Seek>) -> io::Result<usize> {
    let len = t.len();
    let res = syscall!(read(
        fd.as_raw_fd(),
        t.expert().window_mut_ptr() as *mut libc::c_void,
        len
    ));
    tracing!("read: fd={}, window={}, res={:?}", fd.as_raw_fd(), len, res);
    let n = res? as usize;
    unsafe { t.unsafe_advance(n) };
    Ok(n)
}

/// Positional read at `offset`, advancing `lo` by the bytes read. The fd's
/// own file offset is untouched.
pub fn pread(fd: &impl AsRawFd, t: &mut Iobuf<ReadWrite, Seek>, offset: u64) -> io::Result<usize> {
    let len = t.len();
    let res = syscall!(pread(
        fd.as_raw_fd(),
        t.expert().window_mut_ptr() as *mut libc::c_void,
        len,
        offset as libc::off_t
    ));
    tracing!("pread: fd={}, offset={}, res={:?}", fd.as_raw_fd(), offset, res);
    let n = res? as usize;
    unsafe { t.unsafe_advance(n) };
    Ok(n)
}

/// Writes the window out, advancing `lo` by the bytes written.
pub fn write<A: Access>(fd: &impl AsRawFd, t: &mut Iobuf<A, Seek>) -> io::Result<usize> {
    let len = t.len();
    let res = syscall!(write(
        fd.as_raw_fd(),
        t.expert().window_ptr() as *const libc::c_void,
        len
    ));
    tracing!("write: fd={}, window={}, res={:?}", fd.as_raw_fd(), len, res);
    let n = res? as usize;
    unsafe { t.unsafe_advance(n) };
    Ok(n)
}

/// Positional write at `offset`, advancing `lo` by the bytes written. The
/// fd's own file offset is untouched.
pub fn pwrite<A: Access>(
    fd: &impl AsRawFd,
    t: &mut Iobuf<A, Seek>,
    offset: u64,
) -> io::Result<usize> {
    let len = t.len();
    let res = syscall!(pwrite(
        fd.as_raw_fd(),
        t.expert().window_ptr() as *const libc::c_void,
        len,
        offset as libc::off_t
    ));
    tracing!("pwrite: fd={}, offset={}, res={:?}", fd.as_raw_fd(), offset, res);
    let n = res? as usize;
    unsafe { t.unsafe_advance(n) };
    Ok(n)
}

/// Receives one datagram into the window, advancing `lo`, and returns the
/// byte count together with the peer address.
pub fn recvfrom(fd: &impl AsRawFd, t: &mut Iobuf<ReadWrite, Seek>) -> io::Result<(usize, SockAddr)> {
    let len = t.len();
    let ptr = t.expert().window_mut_ptr();
    let (n, addr) = unsafe {
        SockAddr::try_init(|storage, addrlen| {
            let res = syscall!(recvfrom(
                fd.as_raw_fd(),
                ptr as *mut libc::c_void,
                len,
                0,
                storage as *mut libc::sockaddr,
                addrlen
            ));
            tracing!("recvfrom: fd={}, window={}, res={:?}", fd.as_raw_fd(), len, res);
            res.map(|n| n as usize)
        })
    }?;
    unsafe { t.unsafe_advance(n) };
    Ok((n, addr))
}

/// `true` if this platform has `MSG_NOSIGNAL` and therefore compiles the
/// no-SIGPIPE send adapters.
pub const fn no_sigpipe_available() -> bool {
    cfg!(any(target_os = "linux", target_os = "android"))
}

/// `true` if this platform has `recvmmsg` and therefore compiles
/// [`recvmmsg`].
pub const fn recvmmsg_available() -> bool {
    cfg!(any(target_os = "linux", target_os = "android"))
}

/// Sends the window without raising `SIGPIPE` on a closed peer, advancing
/// `lo` by the bytes sent.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn send_no_sigpipe<A: Access>(fd: &impl AsRawFd, t: &mut Iobuf<A, Seek>) -> io::Result<usize> {
    let len = t.len();
    let res = syscall!(send(
        fd.as_raw_fd(),
        t.expert().window_ptr() as *const libc::c_void,
        len,
        libc::MSG_NOSIGNAL
    ));
    tracing!("send: fd={}, window={}, res={:?}", fd.as_raw_fd(), len, res);
    let n = res? as usize;
    unsafe { t.unsafe_advance(n) };
    Ok(n)
}

/// As [`send_no_sigpipe`], addressed to `addr` on an unconnected socket.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn sendto_no_sigpipe<A: Access>(
    fd: &impl AsRawFd,
    t: &mut Iobuf<A, Seek>,
    addr: &SockAddr,
) -> io::Result<usize> {
    let len = t.len();
    let res = syscall!(sendto(
        fd.as_raw_fd(),
        t.expert().window_ptr() as *const libc::c_void,
        len,
        libc::MSG_NOSIGNAL,
        addr.as_ptr(),
        addr.len()
    ));
    tracing!("sendto: fd={}, window={}, res={:?}", fd.as_raw_fd(), len, res);
    let n = res? as usize;
    unsafe { t.unsafe_advance(n) };
    Ok(n)
}

/// Scatter receive: one datagram per iobuf, each landing in that iobuf's
/// window and advancing its `lo`. Returns the number of messages received.
///
/// When `srcs` is supplied it must be at least as long as `bufs`; entry `i`
/// is set to the peer address of message `i`.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn recvmmsg(
    fd: &impl AsRawFd,
    bufs: &mut [Iobuf<ReadWrite, Seek>],
    mut srcs: Option<&mut [Option<SockAddr>]>,
) -> io::Result<usize> {
    if bufs.is_empty() {
        return Ok(0);
    }
    if let Some(ref srcs) = srcs {
        if srcs.len() < bufs.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "srcs slice shorter than bufs",
            ));
        }
    }

    let count = bufs.len();
    let mut iovecs: Vec<libc::iovec> = bufs
        .iter()
        .map(|b| libc::iovec {
            iov_base: b.expert().window_mut_ptr() as *mut libc::c_void,
            iov_len: b.len(),
        })
        .collect();
    let mut storages = vec![unsafe { mem::zeroed::<libc::sockaddr_storage>() }; count];
    let mut hdrs = vec![unsafe { mem::zeroed::<libc::mmsghdr>() }; count];
    for i in 0..count {
        hdrs[i].msg_hdr.msg_iov = &mut iovecs[i];
        hdrs[i].msg_hdr.msg_iovlen = 1;
        hdrs[i].msg_hdr.msg_name = &mut storages[i] as *mut _ as *mut libc::c_void;
        hdrs[i].msg_hdr.msg_namelen = mem::size_of::<libc::sockaddr_storage>() as libc::socklen_t;
    }

    let res = syscall!(recvmmsg(
        fd.as_raw_fd(),
        hdrs.as_mut_ptr(),
        count as libc::c_uint,
        0,
        std::ptr::null_mut()
    ));
    tracing!("recvmmsg: fd={}, bufs={}, res={:?}", fd.as_raw_fd(), count, res);
    let n = res? as usize;

    for i in 0..n {
        let got = hdrs[i].msg_len as usize;
        unsafe { bufs[i].unsafe_advance(got) };
        if let Some(srcs) = srcs.as_mut() {
            let namelen = hdrs[i].msg_hdr.msg_namelen;
            let ((), addr) = unsafe {
                SockAddr::try_init(|st, l| {
                    unsafe {
                        st.write(storages[i]);
                        l.write(namelen);
                    }
                    Ok(())
                })
            }?;
            srcs[i] = Some(addr);
        }
    }
    Ok(n)
}
