/// Generate one test per mutation operator, named `test_<name>_<op>`. Inside the body, the
/// name given before the colon applies that operator with strength 1
#[macro_export]
macro_rules! test_ops {
  ($name:ident[$var:ident: $($op:ident)|+]() $body:tt ) => {$(
      ::paste::paste! {
          #[test]
          fn [<test_ $name _ $op>]() {
            #[allow(unused)]
            let $var = |genome: &mut $crate::genome::Genome, rng: &mut $crate::random::WyRng| {
                $crate::mutate::apply($crate::mutate::MutationKind::[<$op:camel>], genome, 1., rng)
            };
            $body
          }
      }
  )+};
}

#[macro_export]
macro_rules! assert_f64_approx {
    ($l:expr, $r:expr) => {
        assert!(
            ($l - $r).abs() < f64::EPSILON,
            "assertion failed: {} !~ {}",
            $l,
            $r
        )
    };
    ($l:expr, $r:expr, $msg:expr) => {
        assert!(
            ($l - $r).abs() < f64::EPSILON,
            "assertion failed: {} !~ {}: {}",
            $l,
            $r,
            $msg
        )
    };
}
