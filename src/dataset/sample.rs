//! Built-in sample of the CADOP export for local runs without the real file.

use tracing::info;

use super::loader::read_table;
use super::{build_dataset, Dataset};
use crate::error::ServiceError;

pub(crate) const SAMPLE_SOURCE: &str = "sample://Relatorio_cadop.csv";

const SAMPLE_CSV: &str = "\
Registro_ANS;CNPJ;Razao_Social;Nome_Fantasia;Modalidade;Logradouro;Numero;Bairro;Cidade;UF;CEP;DDD;Telefone;Data_Registro_ANS
421545;11222333000181;HOSPITAL SÃO LUCAS LTDA;SÃO LUCAS SAÚDE;Medicina de Grupo;Avenida Paulista;1000;Bela Vista;São Paulo;SP;1310100;11;32145566;2001-03-12
339679;22333444000172;CLÍNICA LUCAS ASSISTÊNCIA MÉDICA S.A.;;Medicina de Grupo;Rua da Aurora;215;Boa Vista;Recife;PE;50050000;81;;1999-11-05
368253;33444555000163;UNIMED CONCEIÇÃO COOPERATIVA DE TRABALHO MÉDICO;UNIMED CONCEIÇÃO;Cooperativa Médica;Praça João Pessoa;12;Centro;Conceição do Araguaia;PA;68540000;94;34211234;2000-06-30
412201;44555666000154;ODONTO PREV ASSOCIAÇÃO DE SAÚDE BUCAL;ODONTOPREV;Odontologia de Grupo;Alameda Santos;415;Cerqueira César;São Paulo;SP;1419000;11;30049000;2003-01-21
354341;;BRADESCO SAÚDE S.A.;BRADESCO SAÚDE;Seguradora Especializada em Saúde;Rua Barão de Itapagipe;225;Rio Comprido;Rio de Janeiro;RJ;20261005;21;25035000;2001-04-17
";

/// Build the sample dataset through the same loader path as a real file.
pub fn sample_dataset() -> Result<Dataset, ServiceError> {
    info!(source = SAMPLE_SOURCE, "Loading built-in sample dataset");
    let table = read_table(SAMPLE_CSV.as_bytes())?;
    build_dataset(table, SAMPLE_SOURCE)
}
