/// Insertion-ordered element -> value map used for ratios and masses
pub mod element_map;
/// Error type of the whole crate
pub mod errors;
/// Module to split a chemical formula into element symbols and stoichiometric coefficients
///
///  # Examples
/// ```
/// use ElemMass::Composition::formula_parser::parse_formula;
/// let ratios = parse_formula("CdCu4Ho");
/// assert_eq!(ratios.symbols(), &["Cd", "Cu", "Ho"]);
/// assert_eq!(ratios.get("Cu"), Some(4.0));
/// ```
pub mod formula_parser;
/// Molar masses of elements: CSV loader and built-in table of standard atomic weights
pub mod molar_mass_table;
/// Distribution of a compound's mass over its elements, either from a total mass
/// or from the known mass of one of its elements
///
///  # Examples
/// ```
/// use ElemMass::Composition::formula_parser::parse_formula;
/// use ElemMass::Composition::mass_allocator::allocate_by_known_element_mass;
/// use ElemMass::Composition::molar_mass_table::MolarMassTable;
/// let table: MolarMassTable = vec![("Na", 22.99), ("Cl", 35.45)].into_iter().collect();
/// let masses = allocate_by_known_element_mass(&parse_formula("NaCl"), "Cl", 10.0, &table).unwrap();
/// assert!((masses.get("Cl").unwrap() - 10.0).abs() < 1e-12);
/// ```
pub mod mass_allocator;
