#[cfg(test)]
pub mod test {
    use crate::binder::{Binder, Options};
    use crate::flag::FlagSet;
    use crate::types::Context;

    /// Register `opts` into a fresh flag set with an empty context.
    pub fn bind_flags<'a, O: Options>(opts: &'a mut O) -> FlagSet<'a> {
        let ctx = Context::default();
        let mut flags = FlagSet::new();
        let mut binder = Binder::new(&mut flags, &ctx);
        opts.bind(&mut binder);
        binder.finish().unwrap();
        flags
    }

    /// Covers every tag shape: explicit name, derived name, dotted name,
    /// escaped default, int default, and an opted-out field.
    #[derive(Debug, Default, PartialEq)]
    pub struct TestOptions {
        pub test_sample: String,
        pub test_no_name: String,
        pub supp_for_test_suite: bool,
        pub escaping: String,
        pub test_int: i64,
        pub ignored: bool,
    }

    impl Options for TestOptions {
        fn bind<'a>(&'a mut self, b: &mut Binder<'a, '_>) {
            b.field("test_sample", &mut self.test_sample, "partest,,")
                .field(
                    "test_no_name",
                    &mut self.test_no_name,
                    ",,this is the description",
                )
                .field(
                    "supp_for_test_suite",
                    &mut self.supp_for_test_suite,
                    "test.v,, this come from test suite",
                )
                .field(
                    "escaping",
                    &mut self.escaping,
                    r"escape,prova\,prova\,aaa,this is a complex test",
                )
                .field("test_int", &mut self.test_int, "testint,10,this is an int")
                .field("ignored", &mut self.ignored, "-,true,ignored");
        }
    }

    /// A record whose every flag has a non-empty default, so validation
    /// passes without any file or command line.
    #[derive(Debug, Default, PartialEq)]
    pub struct ServerOptions {
        pub host: String,
        pub port: i64,
        pub verbose: bool,
        pub db_url: String,
    }

    impl Options for ServerOptions {
        fn bind<'a>(&'a mut self, b: &mut Binder<'a, '_>) {
            b.field("host", &mut self.host, ",localhost,address to bind")
                .field("port", &mut self.port, ",8080,port to listen on")
                .field("verbose", &mut self.verbose, ",false,chatty output")
                .field(
                    "db_url",
                    &mut self.db_url,
                    "database.url,sqlite://local.db,connection string",
                );
        }
    }
}
