use crate::FailResult;

/// Factors out the adding of arguments to a binary together with their parsing,
/// so that several entry points can share groups of arguments.
pub trait CliDeserialize: Sized {
    fn augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> (clap::App<'a, 'b>, ClapDeserializer<Self>)
    {
        let app = Self::_augment_clap_app(app);
        (app, ClapDeserializer(Default::default()))
    }

    /// Call 'augment_clap_app' instead.
    fn _augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b>;
    /// Call 'resolve_args' on the ClapDeserializer instead.
    fn _resolve_args(matches: &clap::ArgMatches<'_>) -> FailResult<Self>;
}

/// Token showing that a clap app was augmented with the arguments of `A`.
pub struct ClapDeserializer<A>(std::marker::PhantomData<A>);

impl<A: CliDeserialize> ClapDeserializer<A> {
    /// May perform IO, such as reading config files.
    pub fn resolve_args(self, matches: &clap::ArgMatches<'_>) -> FailResult<A>
    { A::_resolve_args(matches) }
}

impl<A, B> CliDeserialize for (A, B)
where
    A: CliDeserialize,
    B: CliDeserialize,
{
    fn _augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b>
    { B::_augment_clap_app(A::_augment_clap_app(app)) }

    fn _resolve_args(matches: &clap::ArgMatches<'_>) -> FailResult<Self>
    { Ok((A::_resolve_args(matches)?, B::_resolve_args(matches)?)) }
}
