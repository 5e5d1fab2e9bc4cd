extern crate error_chain;
extern crate serde_json;

error_chain! {
    types {
        Error, ErrorKind, ResultExt, Result;
    }
    errors {
        IterationFailure(desc: String) {
            description(desc)
            display("Iteration failure: {}", desc)
        }

        IllegalState(desc: String) {
            description(desc)
            display("Illegal state: {}", desc)
        }

        IllegalArgument(desc: String) {
            description(desc)
            display("Illegal argument: {}", desc)
        }
    }

    foreign_links {
        FmtError(::std::fmt::Error);
        IoError(::std::io::Error);
        SerdeJsonError(self::serde_json::Error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_iteration_failure_display() {
        let err: Error = ErrorKind::IterationFailure("read postings block 7".into()).into();
        assert_eq!(err.to_string(), "Iteration failure: read postings block 7");
    }

    #[test]
    fn test_io_error_is_linked() {
        fn read() -> Result<()> {
            Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated"))?;
            Ok(())
        }

        let err = read().unwrap_err();
        match *err.kind() {
            ErrorKind::IoError(ref e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            _ => panic!("expected a linked io error"),
        }
    }
}
